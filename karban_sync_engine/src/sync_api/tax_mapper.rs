use log::*;
use unicommerce_tools::SaleOrderItem;

use crate::{
    db_types::{ChargeType, TaxLine},
    mapping::TaxHead,
    settings::TaxAccounts,
};

/// Derives the order's tax lines from its line items.
///
/// A tax head is present when any item carries a non-zero rate for it. The rate on the tax line is the rate of the
/// *first* item, even if that is zero. Lines are emitted in [`TaxHead::ALL`] order. Heads without a configured
/// ledger account produce a line with no account.
pub fn map_taxes(items: &[SaleOrderItem], accounts: &TaxAccounts) -> Vec<TaxLine> {
    let Some(first) = items.first() else {
        return vec![];
    };
    TaxHead::ALL
        .iter()
        .filter(|head| items.iter().any(|item| !head.rate_of(item).is_zero()))
        .map(|&head| {
            let account_head = accounts.account_for(head).map(String::from);
            if account_head.is_none() {
                warn!("🧾️ No ledger account is configured for {head}");
            }
            TaxLine {
                tax_head: head,
                description: head.label().to_string(),
                account_head,
                rate: head.rate_of(first),
                charge_type: ChargeType::OnNetTotal,
                dont_recompute_tax: true,
            }
        })
        .collect()
}
