use std::fmt::Display;

use karban_common::Percent;
use serde::{Deserialize, Serialize};
use unicommerce_tools::SaleOrderItem;

/// The GST tax heads Unicommerce reports per line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxHead {
    Igst,
    Cgst,
    Sgst,
    Ugst,
    Tcs,
}

impl TaxHead {
    /// All tax heads, in the order tax lines are emitted.
    pub const ALL: [TaxHead; 5] = [TaxHead::Igst, TaxHead::Cgst, TaxHead::Sgst, TaxHead::Ugst, TaxHead::Tcs];

    pub fn label(&self) -> &'static str {
        match self {
            TaxHead::Igst => "IGST",
            TaxHead::Cgst => "CGST",
            TaxHead::Sgst => "SGST",
            TaxHead::Ugst => "UGST",
            TaxHead::Tcs => "TCS",
        }
    }

    /// The rate the line item carries for this tax head. A missing field counts as zero.
    pub fn rate_of(&self, item: &SaleOrderItem) -> Percent {
        let rate = match self {
            TaxHead::Igst => item.integrated_gst_percentage,
            TaxHead::Cgst => item.central_gst_percentage,
            TaxHead::Sgst => item.state_gst_percentage,
            TaxHead::Ugst => item.union_territory_gst_percentage,
            TaxHead::Tcs => item.tcs_percentage,
        };
        rate.unwrap_or_default()
    }
}

impl Display for TaxHead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
