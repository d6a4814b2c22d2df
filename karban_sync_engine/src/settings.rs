//! Integration settings.
//!
//! Settings are loaded from a TOML file. Every field has a default, so a minimal file only needs the channels that
//! should be synced:
//!
//! ```toml
//! enabled = true
//! default_customer_group = "Individual"
//! only_sync_completed_orders = true
//!
//! [channels.AMAZON_IN]
//! warehouse = "Stores - KB"
//! company = "Karban Retail"
//! tax_accounts = { igst_account = "IGST - KB", cgst_account = "CGST - KB", sgst_account = "SGST - KB" }
//!
//! [facilities.WH01]
//! company_address = "Karban Retail-Billing"
//! dispatch_address = "Bengaluru Warehouse-Shipping"
//! ```
use std::{collections::HashMap, path::Path};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::TaxHead;

pub const DEFAULT_CUSTOMER_GROUP: &str = "All Customer Groups";
pub const DEFAULT_TERRITORY: &str = "All Territories";
pub const DEFAULT_ORDER_SYNC_FREQUENCY_MINUTES: i64 = 60;
pub const DEFAULT_ORDER_LOOKBACK_MINUTES: i64 = 24 * 60;
/// Sync frequencies and lookback windows are capped at this many days.
pub const MAX_SETTING_DAYS: i64 = 366;
const MAX_SETTING_MINUTES: i64 = MAX_SETTING_DAYS * 24 * 60;

#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    #[error("Could not read the settings file. {0}")]
    Io(String),
    #[error("Invalid settings. {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    /// When false, scheduled and forced syncs do nothing.
    pub enabled: bool,
    /// The customer group for new customers when their channel does not configure one.
    pub default_customer_group: String,
    /// The territory new customers are assigned to.
    pub root_territory: String,
    /// Naming series for orders whose channel does not configure one.
    pub sales_order_series: Option<String>,
    /// Only fetch COMPLETE orders, and generate an invoice for each of them.
    pub only_sync_completed_orders: bool,
    /// The minimum time between two scheduled order syncs.
    pub order_sync_frequency_minutes: i64,
    /// How far back the first order sync looks when there is no checkpoint yet.
    pub order_lookback_minutes: i64,
    pub channels: HashMap<String, ChannelSettings>,
    pub facilities: HashMap<String, FacilitySettings>,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_customer_group: DEFAULT_CUSTOMER_GROUP.to_string(),
            root_territory: DEFAULT_TERRITORY.to_string(),
            sales_order_series: None,
            only_sync_completed_orders: false,
            order_sync_frequency_minutes: DEFAULT_ORDER_SYNC_FREQUENCY_MINUTES,
            order_lookback_minutes: DEFAULT_ORDER_LOOKBACK_MINUTES,
            channels: HashMap::new(),
            facilities: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSettings {
    pub enabled: bool,
    pub warehouse: Option<String>,
    pub company: Option<String>,
    pub customer_group: Option<String>,
    pub sales_order_series: Option<String>,
    pub tax_accounts: TaxAccounts,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            warehouse: None,
            company: None,
            customer_group: None,
            sales_order_series: None,
            tax_accounts: TaxAccounts::default(),
        }
    }
}

/// Ledger accounts per tax head.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxAccounts {
    pub igst_account: Option<String>,
    pub cgst_account: Option<String>,
    pub sgst_account: Option<String>,
    pub ugst_account: Option<String>,
    pub tcs_account: Option<String>,
}

impl TaxAccounts {
    pub fn account_for(&self, head: TaxHead) -> Option<&str> {
        let account = match head {
            TaxHead::Igst => &self.igst_account,
            TaxHead::Cgst => &self.cgst_account,
            TaxHead::Sgst => &self.sgst_account,
            TaxHead::Ugst => &self.ugst_account,
            TaxHead::Tcs => &self.tcs_account,
        };
        account.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilitySettings {
    pub company_address: Option<String>,
    pub dispatch_address: Option<String>,
    /// Overrides the channel warehouse for items fulfilled from this facility.
    pub warehouse: Option<String>,
}

impl IntegrationSettings {
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        toml::from_str(s).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SettingsError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&contents)
    }

    pub fn channel(&self, channel_id: &str) -> Option<&ChannelSettings> {
        self.channels.get(channel_id)
    }

    pub fn is_channel_enabled(&self, channel_id: &str) -> bool {
        self.channel(channel_id).map(|c| c.enabled).unwrap_or(false)
    }

    /// The company and dispatch addresses for a facility. Unknown facilities have neither.
    pub fn company_addresses(&self, facility_code: Option<&str>) -> (Option<String>, Option<String>) {
        facility_code
            .and_then(|code| self.facilities.get(code))
            .map(|f| (f.company_address.clone(), f.dispatch_address.clone()))
            .unwrap_or((None, None))
    }

    pub fn facility_warehouse(&self, facility_code: Option<&str>) -> Option<&str> {
        facility_code.and_then(|code| self.facilities.get(code)).and_then(|f| f.warehouse.as_deref())
    }

    pub fn order_sync_frequency(&self) -> Duration {
        Duration::minutes(self.order_sync_frequency_minutes.clamp(0, MAX_SETTING_MINUTES))
    }

    pub fn order_lookback(&self) -> Duration {
        Duration::minutes(self.order_lookback_minutes.clamp(1, MAX_SETTING_MINUTES))
    }
}
