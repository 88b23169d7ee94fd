//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐     ┌──────────┐    │
//! │  │  Empty   │────►│ In Cart  │────►│  checkout()  │────►│  Empty   │    │
//! │  │  Cart    │     │          │     │  (commit)    │     │  Cart    │    │
//! │  └──────────┘     └──────────┘     └──────────────┘     └──────────┘    │
//! │                        │                  │ failure                     │
//! │                   add_to_cart             └──► cart untouched, retry    │
//! │                   remove_from_cart                                      │
//! │                   set_customer_name                                     │
//! │                   set_discount                                          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ─────────────────────► (back to empty)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use clinic_core::{Capability, Cart, LineToken, PricingBreakdown};

use crate::error::ApiError;
use crate::state::{CartState, DbState, SessionState};

/// Cart contents plus the live breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: Cart,
    pub breakdown: PricingBreakdown,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            cart: cart.clone(),
            breakdown: cart.breakdown(),
        }
    }
}

pub fn get_cart(cart: &CartState) -> CartResponse {
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a snapshot of the service to the cart.
///
/// The price is copied now; later catalog edits do not change the line.
/// Unavailable services are rejected.
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    session: &SessionState,
    service_id: &str,
) -> Result<CartResponse, ApiError> {
    session.authorize(Capability::Checkout)?;
    debug!(service_id = %service_id, "add_to_cart command");

    let service = db
        .inner()
        .services()
        .get_by_id(service_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service", service_id))?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.add_line(&service)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Removes the line with `token`. Unknown tokens are a no-op.
pub fn remove_from_cart(cart: &CartState, token: LineToken) -> CartResponse {
    cart.with_cart_mut(|c| {
        if !c.remove_line(token) {
            debug!(token = %token, "remove_from_cart: no such line");
        }
        CartResponse::from(&*c)
    })
}

pub fn set_customer_name(cart: &CartState, name: &str) -> CartResponse {
    cart.with_cart_mut(|c| {
        c.set_customer_name(name);
        CartResponse::from(&*c)
    })
}

/// Sets the discount from raw input. Out-of-range values are clamped and
/// non-numeric input counts as no discount.
pub fn set_discount(cart: &CartState, input: &str) -> CartResponse {
    cart.with_cart_mut(|c| {
        c.set_discount_input(input);
        CartResponse::from(&*c)
    })
}

pub fn clear_cart(cart: &CartState) -> CartResponse {
    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Fixture;
    use crate::error::ErrorCode;
    use clinic_core::{Money, ServiceInput};

    #[tokio::test]
    async fn test_add_and_breakdown() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let a = fx.service("Consultation", "500", true).await;
        let b = fx.service("CBC", "300", true).await;

        add_to_cart(&fx.db, &fx.cart, &fx.session, &a.id).await.unwrap();
        add_to_cart(&fx.db, &fx.cart, &fx.session, &b.id).await.unwrap();
        let resp = set_discount(&fx.cart, "10");

        assert_eq!(resp.breakdown.subtotal, Money::from_pesos(800));
        assert_eq!(resp.breakdown.discount_amount, Money::from_pesos(80));
        assert_eq!(resp.breakdown.total, Money::from_pesos(720));
    }

    #[tokio::test]
    async fn test_unavailable_rejected() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let off = fx.service("Drug Test", "300", false).await;

        let err = add_to_cart(&fx.db, &fx.cart, &fx.session, &off.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_cart(&fx.cart).cart.lines.is_empty());
    }

    #[tokio::test]
    async fn test_price_frozen_at_add() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let svc = fx.service("CBC", "300", true).await;
        add_to_cart(&fx.db, &fx.cart, &fx.session, &svc.id).await.unwrap();

        let draft = ServiceInput {
            title: "CBC".into(),
            details: "Complete".into(),
            price: "999".into(),
            available: true,
        }
        .validate()
        .unwrap();
        fx.db.inner().services().update(&svc.id, &draft).await.unwrap();

        assert_eq!(get_cart(&fx.cart).breakdown.subtotal, Money::from_pesos(300));
    }

    #[tokio::test]
    async fn test_duplicates_removed_individually() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let svc = fx.service("CBC", "300", true).await;

        add_to_cart(&fx.db, &fx.cart, &fx.session, &svc.id).await.unwrap();
        let resp = add_to_cart(&fx.db, &fx.cart, &fx.session, &svc.id).await.unwrap();
        assert_eq!(resp.cart.lines.len(), 2);

        let first = resp.cart.lines[0].token;
        let resp = remove_from_cart(&fx.cart, first);
        assert_eq!(resp.cart.lines.len(), 1);

        // Second removal of the same token is a no-op
        let resp = remove_from_cart(&fx.cart, first);
        assert_eq!(resp.cart.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_discount_clamped() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let svc = fx.service("CBC", "300", true).await;
        add_to_cart(&fx.db, &fx.cart, &fx.session, &svc.id).await.unwrap();

        assert_eq!(set_discount(&fx.cart, "150").breakdown.total, Money::zero());
        assert_eq!(set_discount(&fx.cart, "-20").breakdown.total, Money::from_pesos(300));
    }
}
