//! Checkout precondition validation.
//!
//! Everything here runs locally, before any remote call: structural cart
//! validation and delivery-form validation. Violations collect into a
//! field -> message map and block submission without mutating anything.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Standard email address shape: local part, @, domain with a dot.
#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Local mobile numbers: 11 digits with the fixed 09 prefix.
#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09\d{9}$").unwrap());

/// Whether a string looks like an email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Whether a string is an 11-digit local mobile number (09 prefix).
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Contact and delivery fields collected at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Field-level validation failures, keyed by field path.
///
/// `BTreeMap` keeps the output ordering stable for clients and tests.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Fold another set of errors into this one.
    pub fn merge(&mut self, other: Self) {
        for (field, message) in other.0 {
            self.push(field, message);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// Structural validation of the cart.
///
/// Every entry must carry a non-empty identifier, a non-empty name, a
/// price > 0, and a positive quantity; the cart must be non-empty and
/// its computed total positive. Nothing is mutated.
#[must_use]
pub fn validate_cart(cart: &Cart) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if cart.is_empty() {
        errors.push("cart", "Your cart is empty");
        return errors;
    }

    for (index, entry) in cart.entries().iter().enumerate() {
        if entry.product.id.is_empty() {
            errors.push(
                format!("items[{index}].id"),
                "Cart entry is missing its product identifier",
            );
        }
        if entry.product.name.trim().is_empty() {
            errors.push(
                format!("items[{index}].name"),
                "Cart entry is missing its product name",
            );
        }
        if entry.product.price <= Decimal::ZERO {
            errors.push(
                format!("items[{index}].price"),
                "Cart entry has an invalid price",
            );
        }
        if entry.quantity == 0 {
            errors.push(
                format!("items[{index}].quantity"),
                "Cart entry has an invalid quantity",
            );
        }
    }

    if cart.total_price() <= Decimal::ZERO {
        errors.push("total", "Order total must be a positive amount");
    }

    errors
}

/// Delivery-form validation.
#[must_use]
pub fn validate_delivery(form: &DeliveryForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if form.address.trim().is_empty() {
        errors.push("address", "Address is required");
    }
    if form.city.trim().is_empty() {
        errors.push("city", "City is required");
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.push("email", "Please enter a valid email address");
    }

    let phone = form.phone.trim();
    if phone.is_empty() {
        errors.push("phone", "Phone number is required");
    } else if !PHONE_RE.is_match(phone) {
        errors.push("phone", "Phone must be 11 digits starting with 09");
    }

    errors
}
