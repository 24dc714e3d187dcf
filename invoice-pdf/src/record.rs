//! Billing record consumed by the composer.
//!
//! The record arrives as the JSON body the billing form posts. Amounts are
//! already rounded display strings; nothing here recomputes them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::InputError;

/// One row of the item table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "display_string")]
    pub quantity: String,
    /// Unit price as typed into the form (not necessarily two decimals).
    #[serde(deserialize_with = "display_string")]
    pub price: String,
    /// Line total, two fraction digits.
    #[serde(deserialize_with = "display_string")]
    pub total: String,
}

impl LineItem {
    pub fn new(description: &str, quantity: &str, price: &str, total: &str) -> Self {
        LineItem {
            description: description.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            total: total.to_string(),
        }
    }
}

/// Everything printed on one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingRecord {
    pub name: String,
    pub address: String,
    pub date: String,
    #[serde(deserialize_with = "display_string")]
    pub receipt_no: String,
    pub recipient_email: String,
    /// Phone or other contact shown beside the biller name.
    pub contact: Option<String>,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "display_string")]
    pub subtotal: String,
    /// Discount percentage.
    #[serde(deserialize_with = "display_string")]
    pub discount: String,
    #[serde(deserialize_with = "display_string")]
    pub gst_percentage: String,
    #[serde(deserialize_with = "display_string")]
    pub discount_amount: String,
    #[serde(deserialize_with = "display_string")]
    pub gst_amount: String,
    #[serde(deserialize_with = "display_string")]
    pub total_amount: String,
    pub bill_to: Option<String>,
    pub ship_to: Option<String>,
}

impl BillingRecord {
    /// Parse and validate a record from the form's JSON body.
    pub fn from_json(json: &str) -> Result<BillingRecord, InputError> {
        let record: BillingRecord =
            serde_json::from_str(json).map_err(|e| InputError::Json(e.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    /// Check the invariants the layout relies on.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.items.is_empty() {
            return Err(InputError::EmptyItems);
        }
        require("name", &self.name)?;
        require("date", &self.date)?;
        require("receiptNo", &self.receipt_no)?;

        money("subtotal", &self.subtotal)?;
        money("discountAmount", &self.discount_amount)?;
        money("gstAmount", &self.gst_amount)?;
        money("totalAmount", &self.total_amount)?;
        optional_number("discount", &self.discount)?;
        optional_number("gstPercentage", &self.gst_percentage)?;

        for (index, item) in self.items.iter().enumerate() {
            let bad = |field: &'static str, value: &str| InputError::InvalidItem {
                index,
                field,
                value: value.to_string(),
            };
            if !is_decimal(&item.quantity) {
                return Err(bad("quantity", &item.quantity));
            }
            if !is_decimal(&item.price) {
                return Err(bad("price", &item.price));
            }
            if !is_money(&item.total) {
                return Err(bad("total", &item.total));
            }
        }
        Ok(())
    }

    /// `<prefix>/<receiptNo>/<period>`, e.g. `XYZ/1042/25-26`.
    pub fn invoice_number(&self, prefix: &str, period: &str) -> String {
        format!("{}/{}/{}", prefix, self.receipt_no.trim(), period)
    }

    /// Discount percentage as printed in the summary ("10%"). An absent
    /// discount prints as "0%".
    pub fn discount_label(&self) -> String {
        let discount = self.discount.trim();
        if discount.is_empty() {
            "0%".to_string()
        } else {
            format!("{}%", discount)
        }
    }

    /// Bill-to address, falling back to the biller address.
    pub fn bill_to_address(&self) -> &str {
        non_empty(self.bill_to.as_deref()).unwrap_or(&self.address)
    }

    /// Ship-to address, falling back to the bill-to address.
    pub fn ship_to_address(&self) -> &str {
        non_empty(self.ship_to.as_deref()).unwrap_or_else(|| self.bill_to_address())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        Err(InputError::MissingField { field })
    } else {
        Ok(())
    }
}

fn money(field: &'static str, value: &str) -> Result<(), InputError> {
    require(field, value)?;
    if is_money(value) {
        Ok(())
    } else {
        Err(InputError::InvalidAmount {
            field,
            value: value.to_string(),
        })
    }
}

fn optional_number(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() || is_decimal(value) {
        Ok(())
    } else {
        Err(InputError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }
}

/// Non-negative amount with exactly two fraction digits ("106.20").
fn is_money(value: &str) -> bool {
    match value.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.len() == 2
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Non-negative decimal number ("2", "49.5", "0.75").
fn is_decimal(value: &str) -> bool {
    let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    !(whole.is_empty() && frac.is_empty()) && digits(whole) && digits(frac)
}

/// Accept a JSON string or number and keep it as display text. The form
/// posts some values (`discount: 0`, `quantity: 0`) as numbers.
fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
