//! # Letterhead
//!
//! Clinic identity printed at the top of every document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letterhead {
    /// Clinic name, the largest text on the page.
    pub name: String,
    /// Street address lines, printed under the name on invoices.
    #[serde(default)]
    pub address_lines: Vec<String>,
    /// Phone or email line, printed after the address.
    #[serde(default)]
    pub contact: Option<String>,
    /// Receipt subtitle.
    #[serde(default = "default_receipt_title")]
    pub receipt_title: String,
}

fn default_receipt_title() -> String {
    "Official Receipt".to_string()
}

impl Default for Letterhead {
    fn default() -> Self {
        Letterhead {
            name: "Toledo Doctors & Diagnostic Center".to_string(),
            address_lines: vec![
                "123 Medical Center Drive".to_string(),
                "Toledo, City".to_string(),
            ],
            contact: Some("Contact: (123) 456-7890".to_string()),
            receipt_title: default_receipt_title(),
        }
    }
}

impl Letterhead {
    /// Address lines followed by the contact line.
    pub fn detail_lines(&self) -> impl Iterator<Item = &str> {
        self.address_lines
            .iter()
            .map(String::as_str)
            .chain(self.contact.as_deref())
    }
}
