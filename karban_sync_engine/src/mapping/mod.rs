//! Static translation tables from Unicommerce codes to local record values.
//!
//! Every table is an enumeration with an exhaustive `match`, so an unknown upstream code can only ever map to an
//! explicit "unmapped" result.
mod countries;
mod indian_states;
mod tax_heads;

pub use countries::{Country, CountryMapping};
pub use indian_states::IndianState;
pub use tax_heads::TaxHead;
