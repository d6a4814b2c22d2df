use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use karban_common::Percent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Type;
use thiserror::Error;

use crate::mapping::TaxHead;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(pub String);

//--------------------------------------       OrderCode       ---------------------------------------------------------
/// The upstream order code. It is the idempotency key for materialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderCode(pub String);

impl From<String> for OrderCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     CorrelationId     ---------------------------------------------------------
/// Binds a materialization attempt to its audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct CorrelationId(pub String);

impl<S: Into<String>> From<S> for CorrelationId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     AttemptContext    ---------------------------------------------------------
/// The execution context of a single materialization attempt.
///
/// Every write made on behalf of the attempt receives the context explicitly, so that writes can be attributed to
/// (and rolled back with) the attempt that made them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptContext {
    pub correlation_id: CorrelationId,
    /// The identity the writes are made as.
    pub actor: String,
}

impl AttemptContext {
    pub fn new(correlation_id: CorrelationId, actor: &str) -> Self {
        Self { correlation_id, actor: actor.to_string() }
    }
}

//--------------------------------------      GstCategory      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum GstCategory {
    RegisteredRegular,
    Unregistered,
}

impl Display for GstCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GstCategory::RegisteredRegular => write!(f, "Registered Regular"),
            GstCategory::Unregistered => write!(f, "Unregistered"),
        }
    }
}

//--------------------------------------      TaxIdentity      ---------------------------------------------------------
/// A customer's tax registration as reported on a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxIdentity {
    /// The GSTIN. Empty when the customer is unregistered.
    pub gstin: String,
    pub category: GstCategory,
}

impl TaxIdentity {
    pub fn unregistered() -> Self {
        Self { gstin: String::default(), category: GstCategory::Unregistered }
    }

    pub fn registered<S: Into<String>>(gstin: S) -> Self {
        Self { gstin: gstin.into(), category: GstCategory::RegisteredRegular }
    }

    /// `None` (a missing or sentinel GSTIN) maps to an unregistered identity.
    pub fn from_gstin(gstin: Option<&str>) -> Self {
        match gstin {
            Some(g) => Self::registered(g),
            None => Self::unregistered(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.category == GstCategory::RegisteredRegular
    }
}

//--------------------------------------      AddressRole      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum AddressRole {
    Billing,
    Shipping,
    BillingAndShipping,
}

impl AddressRole {
    /// The address type recorded on the address itself. Combined addresses are recorded as billing addresses that
    /// also serve as the shipping address.
    pub fn address_type(&self) -> &'static str {
        match self {
            AddressRole::Billing | AddressRole::BillingAndShipping => "Billing",
            AddressRole::Shipping => "Shipping",
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, AddressRole::Billing | AddressRole::BillingAndShipping)
    }

    pub fn is_shipping(&self) -> bool {
        matches!(self, AddressRole::Shipping | AddressRole::BillingAndShipping)
    }
}

//--------------------------------------    CanonicalAddress   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAddress {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    /// The country name. `None` when the upstream country code is not in the country table.
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: AddressRole,
    pub tax_identity: TaxIdentity,
}

//--------------------------------------     IdentityMarkers   ---------------------------------------------------------
/// The values stored on a customer so that later orders from the same customer can find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMarkers {
    /// The customer's identity address rendered as JSON, without the upstream address id.
    pub address_json: String,
    pub customer_code: Option<String>,
}

//--------------------------------------        Customer       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub customer_name: String,
    pub customer_group: String,
    pub territory: String,
    pub customer_type: String,
    pub markers: IdentityMarkers,
    pub tax_identity: TaxIdentity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewCustomer      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub customer_name: String,
    pub customer_group: String,
    pub territory: String,
    pub customer_type: String,
    pub markers: IdentityMarkers,
    pub tax_identity: TaxIdentity,
}

//--------------------------------------        TaxLine        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeType {
    OnNetTotal,
}

impl Display for ChargeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeType::OnNetTotal => write!(f, "On Net Total"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub tax_head: TaxHead,
    pub description: String,
    /// The ledger account for the tax. `None` when the channel has no account configured for this tax head.
    pub account_head: Option<String>,
    pub rate: Percent,
    pub charge_type: ChargeType,
    pub dont_recompute_tax: bool,
}

//--------------------------------------     OrderLineItem     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub item_code: String,
    pub item_name: Option<String>,
    pub rate: f64,
    pub qty: i64,
    pub warehouse: Option<String>,
    /// The upstream line item code
    pub upstream_item_code: String,
}

//--------------------------------------       DocStatus       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum DocStatus {
    /// The record exists but has not been finalized.
    Materialized,
    /// The record is final. Only cancellation may change it.
    Submitted,
    /// Terminal.
    Cancelled,
}

impl Display for DocStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocStatus::Materialized => write!(f, "Materialized"),
            DocStatus::Submitted => write!(f, "Submitted"),
            DocStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_code: OrderCode,
    /// The upstream status at the time of materialization
    pub order_status: String,
    pub customer_id: i64,
    pub channel: String,
    pub naming_series: Option<String>,
    pub facility_code: Option<String>,
    pub is_cod: bool,
    pub transaction_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub items: Vec<OrderLineItem>,
    pub company: Option<String>,
    pub taxes: Vec<TaxLine>,
    pub company_address: Option<String>,
    pub dispatch_address: Option<String>,
    pub currency: Option<String>,
    /// The upstream payload the order was built from
    pub raw_data: Value,
}

impl NewOrder {
    pub fn is_cancelled_upstream(&self) -> bool {
        self.order_status == "CANCELLED"
    }
}

//--------------------------------------     CanonicalOrder    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalOrder {
    pub id: i64,
    /// The record name, derived from the naming series
    pub name: String,
    pub order_code: OrderCode,
    pub order_status: String,
    pub customer_id: i64,
    pub channel: String,
    pub naming_series: Option<String>,
    pub facility_code: Option<String>,
    pub is_cod: bool,
    pub transaction_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub items: Vec<OrderLineItem>,
    pub company: Option<String>,
    pub taxes: Vec<TaxLine>,
    pub company_address: Option<String>,
    pub dispatch_address: Option<String>,
    pub currency: Option<String>,
    pub raw_data: Value,
    pub doc_status: DocStatus,
    /// The attempt that created the order
    pub correlation_id: Option<CorrelationId>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CanonicalOrder {
    pub fn net_total(&self) -> f64 {
        self.items.iter().map(|i| i.rate * i.qty as f64).sum()
    }

    /// Taxes are all charged on the net total.
    pub fn total_taxes(&self) -> f64 {
        let net = self.net_total();
        self.taxes.iter().map(|t| net * t.rate.as_f64() / 100.0).sum()
    }

    pub fn grand_total(&self) -> f64 {
        self.net_total() + self.total_taxes()
    }
}

//--------------------------------------        Invoice        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub order_id: i64,
    pub order_code: OrderCode,
    pub customer_id: i64,
    pub net_total: f64,
    pub total_taxes: f64,
    pub grand_total: f64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      AuditStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum AuditStatus {
    Queued,
    Success,
    Error,
}

impl Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::Queued => write!(f, "Queued"),
            AuditStatus::Success => write!(f, "Success"),
            AuditStatus::Error => write!(f, "Error"),
        }
    }
}

//--------------------------------------      AuditOutcome     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOutcome {
    pub status: AuditStatus,
    pub error: Option<String>,
    /// Asks the store to undo every write made under the attempt's correlation id.
    pub rollback: bool,
}

impl AuditOutcome {
    pub fn success() -> Self {
        Self { status: AuditStatus::Success, error: None, rollback: false }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self { status: AuditStatus::Error, error: Some(error.into()), rollback: true }
    }
}

//--------------------------------------       AuditEntry      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: CorrelationId,
    pub method: String,
    pub request_data: Value,
    /// The caller's own reference for the request (`X-Request-Id`), if it sent one.
    pub request_id: Option<String>,
    pub status: AuditStatus,
    pub message: Option<String>,
    pub rollback_requested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
