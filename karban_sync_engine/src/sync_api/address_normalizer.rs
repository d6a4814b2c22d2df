//! Maps Unicommerce addresses onto canonical address records.
//!
//! Normalization never fails. Missing optional fields stay unset, an unknown country code leaves the country unset,
//! and an unrecognized Indian state code is kept verbatim.
use karban_common::helpers::non_blank;
use log::*;
use unicommerce_tools::UnicommerceAddress;

use crate::{
    db_types::{AddressRole, CanonicalAddress, TaxIdentity},
    mapping::{CountryMapping, IndianState},
};

/// Used for `address_line1` when the upstream address has none.
pub const ADDRESS_LINE1_FALLBACK: &str = "Not provided";
const INDIA: &str = "IN";

pub fn normalize_address(raw: &UnicommerceAddress, role: AddressRole, tax_identity: &TaxIdentity) -> CanonicalAddress {
    let country_code = non_blank(raw.country.as_deref());
    let country = CountryMapping::from_code(country_code);
    if let CountryMapping::Unmapped(code) = &country {
        warn!("🏠️ Country code {code} is not in the country table. The address will have no country.");
    }
    CanonicalAddress {
        address_line1: non_blank(raw.address_line1.as_deref()).unwrap_or(ADDRESS_LINE1_FALLBACK).to_string(),
        address_line2: raw.address_line2.clone(),
        city: raw.city.clone(),
        county: raw.district.clone(),
        state: normalize_state(country_code, raw.state.as_deref()),
        country: country.country_name().map(String::from),
        pincode: raw.pincode.clone(),
        email: raw.email.clone(),
        phone: raw.phone.clone(),
        role,
        tax_identity: tax_identity.clone(),
    }
}

/// Indian state codes are replaced by the state name. States elsewhere, and codes that are not in the table, are
/// kept as they are.
fn normalize_state(country_code: Option<&str>, state: Option<&str>) -> Option<String> {
    match (country_code, state) {
        (Some(INDIA), Some(code)) => match IndianState::from_code(code) {
            Some(s) => Some(s.name().to_string()),
            None => {
                debug!("🏠️ {code} is not a known Indian state code. Keeping it as is.");
                Some(code.to_string())
            },
        },
        (_, state) => state.map(String::from),
    }
}

/// Derives the customer addresses for an order's address list.
///
/// A single address serves as both the billing and the shipping address. Otherwise the first address is the billing
/// address and the second the shipping address. Any further addresses are ignored.
pub fn addresses_for_order(addresses: &[UnicommerceAddress], tax_identity: &TaxIdentity) -> Vec<CanonicalAddress> {
    match addresses {
        [] => vec![],
        [only] => vec![normalize_address(only, AddressRole::BillingAndShipping, tax_identity)],
        [billing, shipping, rest @ ..] => {
            if !rest.is_empty() {
                debug!("🏠️ Ignoring {} extra addresses", rest.len());
            }
            vec![
                normalize_address(billing, AddressRole::Billing, tax_identity),
                normalize_address(shipping, AddressRole::Shipping, tax_identity),
            ]
        },
    }
}
