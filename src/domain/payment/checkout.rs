//! Checkout request value objects.
//!
//! A `CheckoutRequest` is what an internal caller sends to start paying for an
//! order. It is validated here and turned into processor-native
//! `LineItemPrice` descriptors before any outbound call is made.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Request to open a checkout session for one order.
///
/// Unknown properties are rejected at decode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckoutRequest {
    /// ISO currency code, passed through to the processor untouched.
    pub currency: String,

    /// Internal order identifier, attached to the payment as metadata.
    pub order_id: String,

    /// Items being purchased.
    pub items: Vec<CheckoutItem>,
}

/// A single purchased item, priced in major currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Processor-native price descriptor for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemPrice {
    pub currency: String,
    pub name: String,
    /// Amount in minor units (cents).
    pub unit_amount: i64,
    pub quantity: u32,
}

impl CheckoutRequest {
    /// Checks the request invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant:
    /// - `currency`, `orderId` and every item `name` must be non-blank
    /// - `items` must be non-empty
    /// - every `price` must be finite and `>= 0`
    /// - every `quantity` must be `>= 1`
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.currency.trim().is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if self.order_id.trim().is_empty() {
            return Err(ValidationError::empty_field("orderId"));
        }
        if self.items.is_empty() {
            return Err(ValidationError::invalid_format(
                "items",
                "at least one item is required",
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(ValidationError::empty_field(format!("items[{}].name", index)));
            }
            if !item.price.is_finite() {
                return Err(ValidationError::invalid_format(
                    format!("items[{}].price", index),
                    "price must be a finite number",
                ));
            }
            if item.price < 0.0 {
                return Err(ValidationError::below_minimum(
                    format!("items[{}].price", index),
                    0,
                    item.price,
                ));
            }
            if item.quantity < 1 {
                return Err(ValidationError::below_minimum(
                    format!("items[{}].quantity", index),
                    1,
                    item.quantity,
                ));
            }
        }

        Ok(())
    }

    /// Maps every item to a processor price descriptor, preserving order.
    pub fn line_item_prices(&self) -> Vec<LineItemPrice> {
        self.items
            .iter()
            .map(|item| LineItemPrice {
                currency: self.currency.clone(),
                name: item.name.clone(),
                unit_amount: to_minor_units(item.price),
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Converts a major-unit price to minor units, rounding to the nearest cent.
///
/// Rounds rather than truncates: `19.999` becomes `2000`.
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}
