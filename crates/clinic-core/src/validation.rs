//! # Validation Module
//!
//! Input validation for catalog, checkout, expense and login forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command layer                                                │
//! │  └── THIS MODULE: required fields, amount parsing                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (price_cents >= 0), CHECK (amount_cents > 0)                │
//! │                                                                         │
//! │  A failed check aborts the operation before any state is mutated.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_TITLE_LEN: usize = 120;
const MAX_DETAILS_LEN: usize = 500;
const MAX_CUSTOMER_NAME_LEN: usize = 120;
const MAX_QUERY_LEN: usize = 100;

/// Largest price or expense accepted: ₱10,000,000.00.
pub const MAX_AMOUNT: Money = Money::from_cents(1_000_000_000);

// =============================================================================
// String Validators
// =============================================================================

fn required_trimmed(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates the customer name entered at checkout.
///
/// ## Example
/// ```rust
/// use clinic_core::validation::validate_customer_name;
///
/// assert_eq!(validate_customer_name("  Juan Dela Cruz ").unwrap(), "Juan Dela Cruz");
/// assert!(validate_customer_name("   ").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    required_trimmed("customer name", name, MAX_CUSTOMER_NAME_LEN)
}

/// Validates a service title.
pub fn validate_service_title(title: &str) -> ValidationResult<String> {
    required_trimmed("title", title, MAX_TITLE_LEN)
}

/// Validates service details.
pub fn validate_service_details(details: &str) -> ValidationResult<String> {
    required_trimmed("details", details, MAX_DETAILS_LEN)
}

/// Validates a search query. Empty is allowed and means "everything".
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a login email: non-empty with an `@` between two parts.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(email.to_lowercase())
        }
        _ => Err(ValidationError::invalid("email", "must look like name@domain")),
    }
}

// =============================================================================
// Amount Validators
// =============================================================================

fn parse_amount(field: &str, input: &str) -> ValidationResult<Money> {
    let amount = input
        .parse::<Money>()
        .map_err(|e| ValidationError::invalid(field, e.to_string()))?;

    if amount > MAX_AMOUNT {
        return Err(ValidationError::invalid(
            field,
            format!("must be at most {}", MAX_AMOUNT.format_grouped()),
        ));
    }

    Ok(amount)
}

/// Parses a catalog price. Zero is allowed (free services).
///
/// ## Example
/// ```rust
/// use clinic_core::validation::parse_price;
///
/// assert_eq!(parse_price("1,500").unwrap().cents(), 150000);
/// assert!(parse_price("0").is_ok());
/// assert!(parse_price("-1").is_err());
/// assert!(parse_price("").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    if input.trim().is_empty() {
        return Err(ValidationError::required("price"));
    }

    let price = parse_amount("price", input)?;
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(price)
}

/// Parses an expense amount. Must be strictly positive.
///
/// ## User Workflow
/// ```text
/// Operator types "abc" ──► parse_expense_amount ──► InvalidFormat
///                                                   (ledger untouched)
/// Operator types "250" ──► parse_expense_amount ──► ₱250.00 ──► add()
/// ```
pub fn parse_expense_amount(input: &str) -> ValidationResult<Money> {
    if input.trim().is_empty() {
        return Err(ValidationError::required("amount"));
    }

    let amount = parse_amount("amount", input)?;
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(amount)
}

// =============================================================================
// ID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use clinic_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id.trim())
        .map_err(|_| ValidationError::invalid("id", "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
