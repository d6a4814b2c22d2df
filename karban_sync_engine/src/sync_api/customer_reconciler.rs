//! Finds or creates the customer for an order.
//!
//! Unicommerce does not deduplicate customers. A customer is identified by the order's identity address (the billing
//! address, or else the first address) together with the upstream customer code. Both are stored on the customer as
//! [`IdentityMarkers`] when it is created, and later orders are matched against them.
use karban_common::helpers::non_blank;
use log::*;
use unicommerce_tools::SaleOrder;

use crate::{
    db_types::{AttemptContext, Customer, IdentityMarkers, NewCustomer, TaxIdentity},
    settings::IntegrationSettings,
    sync_api::address_normalizer::addresses_for_order,
    traits::{IdentityStore, StoreError},
};

pub const CUSTOMER_TYPE: &str = "Individual";
/// Markers for orders that carry no address at all.
const EMPTY_ADDRESS_JSON: &str = "{}";

pub fn identity_markers(order: &SaleOrder) -> IdentityMarkers {
    let address_json = order
        .identity_address()
        .map(|a| a.identity_json())
        .unwrap_or_else(|| EMPTY_ADDRESS_JSON.to_string());
    IdentityMarkers { address_json, customer_code: order.customer_code.clone() }
}

/// Builds a new customer for the order. The order must not match an existing customer.
pub fn new_customer(order: &SaleOrder, settings: &IntegrationSettings, markers: IdentityMarkers) -> NewCustomer {
    let customer_group = settings
        .channel(&order.channel)
        .and_then(|c| non_blank(c.customer_group.as_deref()))
        .unwrap_or(settings.default_customer_group.as_str())
        .to_string();
    let customer_name = order
        .identity_address()
        .and_then(|a| non_blank(a.name.as_deref()))
        .map(String::from)
        .unwrap_or_else(|| format!("{} customer", order.channel));
    NewCustomer {
        customer_name,
        customer_group,
        territory: settings.root_territory.clone(),
        customer_type: CUSTOMER_TYPE.to_string(),
        markers,
        tax_identity: TaxIdentity::from_gstin(order.gstin()),
    }
}

/// Returns the customer for the order, creating it if necessary.
///
/// An existing customer always has its tax identity replaced by the one on this order. The order's addresses are
/// stored and linked to the customer in both cases.
pub async fn reconcile_customer<B: IdentityStore>(
    db: &B,
    settings: &IntegrationSettings,
    order: &SaleOrder,
    ctx: &AttemptContext,
) -> Result<Customer, StoreError> {
    let tax_identity = TaxIdentity::from_gstin(order.gstin());
    let markers = identity_markers(order);
    let customer = match db.find_customer(&markers).await? {
        Some(existing) => {
            debug!(
                "🔄️👤️ Order {} belongs to existing customer #{}. Setting GST category to {}",
                order.code, existing.id, tax_identity.category
            );
            db.update_tax_identity(existing.id, &tax_identity, ctx).await?
        },
        None => {
            let customer = db.persist_customer(new_customer(order, settings, markers), ctx).await?;
            info!("🔄️👤️ New customer #{} ({}) created for order {}", customer.id, customer.customer_name, order.code);
            customer
        },
    };
    for address in addresses_for_order(&order.addresses, &tax_identity) {
        let role = address.role;
        let id = db.persist_address(address, customer.id, ctx).await?;
        trace!("🔄️👤️ {role:?} address #{id} linked to customer #{}", customer.id);
    }
    Ok(customer)
}
