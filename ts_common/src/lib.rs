mod helpers;
mod rupees;
mod secret;

pub use helpers::parse_boolean_flag;
pub use rupees::{Rupees, RupeesConversionError, INR_CURRENCY_CODE};
pub use secret::Secret;
