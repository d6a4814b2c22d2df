pub mod helpers;
mod percent;
mod secret;

pub use percent::{Percent, PercentConversionError};
pub use secret::Secret;
