pub mod currency;
pub mod error;
pub mod money;

pub use currency::{CurrencyCode, CurrencyDescriptor, CurrencyRegistry};
pub use error::{EngineError, PolicyError, Result, TransportError, ValidationError};
pub use money::{MinorUnits, Money, MoneyNormalizer};
