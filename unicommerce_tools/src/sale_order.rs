use std::fmt::Display;

use karban_common::{helpers::non_blank, Percent};
use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UnicommerceApiError;

/// The sentinel Unicommerce sends in `customerGSTIN` when the customer has no GST registration.
pub const NULL_GSTIN: &str = "null";

//--------------------------------------   SaleOrderStatus    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SaleOrderStatus {
    Created,
    PendingVerification,
    Processing,
    Complete,
    Cancelled,
    /// Any status this integration does not act on. The upstream value is kept verbatim.
    Other(String),
}

impl SaleOrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::PendingVerification => "PENDING_VERIFICATION",
            Self::Processing => "PROCESSING",
            Self::Complete => "COMPLETE",
            Self::Cancelled => "CANCELLED",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for SaleOrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATED" => Self::Created,
            "PENDING_VERIFICATION" => Self::PendingVerification,
            "PROCESSING" => Self::Processing,
            "COMPLETE" => Self::Complete,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<SaleOrderStatus> for String {
    fn from(value: SaleOrderStatus) -> Self {
        value.as_str().to_string()
    }
}

impl Display for SaleOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------      ItemStatus      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Cancelled,
    Other(String),
}

impl From<String> for ItemStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<ItemStatus> for String {
    fn from(value: ItemStatus) -> Self {
        match value {
            ItemStatus::Cancelled => "CANCELLED".to_string(),
            ItemStatus::Other(s) => s,
        }
    }
}

//--------------------------------------  UnicommerceAddress  ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnicommerceAddress {
    /// Upstream row id. It can differ between two orders for the same physical address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UnicommerceAddress {
    /// A JSON rendering of the address without the volatile upstream `id`, with keys in sorted order. Two renderings
    /// are equal exactly when the addresses are, so the result can be used as a lookup key.
    pub fn identity_json(&self) -> String {
        let stripped = Self { id: None, ..self.clone() };
        // Serializing a plain struct of strings cannot fail.
        serde_json::to_value(&stripped).map(|v| v.to_string()).unwrap_or_default()
    }
}

//--------------------------------------    SaleOrderItem     ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOrderItem {
    pub code: String,
    pub item_sku: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub facility_code: Option<String>,
    #[serde(default)]
    pub status_code: Option<ItemStatus>,
    #[serde(default)]
    pub integrated_gst_percentage: Option<Percent>,
    #[serde(default)]
    pub central_gst_percentage: Option<Percent>,
    #[serde(default)]
    pub state_gst_percentage: Option<Percent>,
    #[serde(default)]
    pub union_territory_gst_percentage: Option<Percent>,
    #[serde(default)]
    pub tcs_percentage: Option<Percent>,
}

impl SaleOrderItem {
    pub fn new<S: Into<String>>(code: S, item_sku: S) -> Self {
        Self { code: code.into(), item_sku: item_sku.into(), ..Default::default() }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status_code, Some(ItemStatus::Cancelled))
    }
}

//--------------------------------------      SaleOrder       ---------------------------------------------------------
/// A Unicommerce sale order (`saleOrderDTO`).
///
/// Only the fields this integration reads are modelled. Unknown fields are ignored, but every field without a
/// default is required and a payload missing one is rejected by [`SaleOrder::from_payload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOrder {
    pub code: String,
    #[serde(default)]
    pub display_order_code: Option<String>,
    pub status: SaleOrderStatus,
    pub channel: String,
    pub sale_order_items: Vec<SaleOrderItem>,
    #[serde(default)]
    pub addresses: Vec<UnicommerceAddress>,
    #[serde(default)]
    pub billing_address: Option<UnicommerceAddress>,
    #[serde(default)]
    pub customer_code: Option<String>,
    #[serde(default, rename = "customerGSTIN")]
    pub customer_gstin: Option<String>,
    pub cod: bool,
    /// Epoch milliseconds
    pub display_order_date_time: i64,
    /// Epoch milliseconds
    #[serde(default)]
    pub fulfillment_tat: Option<i64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
}

impl SaleOrder {
    /// Validates and parses an untyped sale order payload.
    pub fn from_payload(payload: Value) -> Result<Self, UnicommerceApiError> {
        trace!("Parsing sale order payload: {payload}");
        serde_json::from_value(payload).map_err(|e| UnicommerceApiError::InvalidPayload(e.to_string()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SaleOrderStatus::Cancelled
    }

    /// The customer's GSTIN, or `None` when the customer is unregistered. Unicommerce sends the literal string
    /// `"null"` for missing values; blank strings are treated the same way.
    pub fn gstin(&self) -> Option<&str> {
        non_blank(self.customer_gstin.as_deref()).filter(|s| *s != NULL_GSTIN)
    }

    /// The address used to identify the customer: the explicit billing address if there is one, otherwise the first
    /// address in the list.
    pub fn identity_address(&self) -> Option<&UnicommerceAddress> {
        self.billing_address.as_ref().or_else(|| self.addresses.first())
    }

    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

//--------------------------------------   SaleOrderSummary   ---------------------------------------------------------
/// An element of a sale order search result. The full order must be fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOrderSummary {
    pub code: String,
    #[serde(default)]
    pub display_order_code: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub status: Option<SaleOrderStatus>,
}
