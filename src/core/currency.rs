use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::core::{EngineError, Result};

/// ISO-style currency code, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        CurrencyCode(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        CurrencyCode::new(code)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        CurrencyCode::new(code)
    }
}

/// Reference data for one currency
///
/// `scale` is the number of minor units in one display unit (100 for cents,
/// 1 for currencies without a minor unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDescriptor {
    pub code: CurrencyCode,
    pub scale: u32,
    pub symbol: String,
}

impl CurrencyDescriptor {
    pub fn new(code: impl Into<CurrencyCode>, scale: u32, symbol: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            scale,
            symbol: symbol.into(),
        }
    }

    /// Number of fractional digits a display amount may carry
    ///
    /// Only meaningful once the descriptor has been validated.
    pub fn decimal_places(&self) -> u32 {
        let mut places = 0;
        let mut scale = self.scale;
        while scale >= 10 {
            scale /= 10;
            places += 1;
        }
        places
    }

    /// Rounds a display amount to this currency's minor-unit precision (half away from zero)
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.decimal_places(), RoundingStrategy::MidpointAwayFromZero)
    }

    /// Checks that a display amount carries no more fractional digits than the currency allows
    pub fn validate_precision(&self, amount: Decimal) -> std::result::Result<(), String> {
        let expected = self.decimal_places();
        if amount.normalize().scale() > expected {
            return Err(format!(
                "{} amounts must have at most {} decimal places, got {}",
                self.code, expected, amount
            ));
        }
        Ok(())
    }

    /// Formats an amount with the currency symbol and the correct number of decimals
    pub fn format_amount(&self, amount: Decimal) -> String {
        let places = self.decimal_places() as usize;
        let rounded = self.round(amount);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{:.width$}", self.symbol, rounded.abs(), width = places)
        } else {
            format!("{}{:.width$}", self.symbol, rounded.abs(), width = places)
        }
    }

    fn validate(&self) -> Result<()> {
        let code = self.code.as_str();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(EngineError::Configuration(format!(
                "Currency code '{}' must be three upper-case letters",
                code
            )));
        }

        // 1, 10, 100, 1000 ...
        let mut scale = self.scale;
        if scale == 0 {
            return Err(EngineError::Configuration(format!(
                "Currency {} scale must be a positive power of ten",
                code
            )));
        }
        while scale % 10 == 0 {
            scale /= 10;
        }
        if scale != 1 {
            return Err(EngineError::Configuration(format!(
                "Currency {} scale {} is not a power of ten",
                code, self.scale
            )));
        }

        if self.symbol.trim().is_empty() {
            return Err(EngineError::Configuration(format!(
                "Currency {} symbol cannot be empty",
                code
            )));
        }

        Ok(())
    }
}

/// Shape of a registry file
#[derive(Debug, Deserialize)]
struct RegistryFile {
    currencies: Vec<CurrencyDescriptor>,
}

/// Lookup table of currency descriptors, built once at startup and passed to
/// everything that needs a scale or symbol
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    currencies: HashMap<CurrencyCode, CurrencyDescriptor>,
}

impl CurrencyRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the currencies the console ships with
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for descriptor in [
            CurrencyDescriptor::new("USD", 100, "$"),
            CurrencyDescriptor::new("EUR", 100, "€"),
            CurrencyDescriptor::new("GBP", 100, "£"),
            CurrencyDescriptor::new("MYR", 100, "RM"),
            CurrencyDescriptor::new("JPY", 1, "¥"),
            CurrencyDescriptor::new("IDR", 1, "Rp"),
        ] {
            registry.currencies.insert(descriptor.code.clone(), descriptor);
        }
        registry
    }

    /// Parse a YAML registry document
    ///
    /// ```yaml
    /// currencies:
    ///   - { code: EUR, scale: 100, symbol: "€" }
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml).map_err(|e| {
            EngineError::Configuration(format!("Invalid currency registry: {}", e))
        })?;

        let mut registry = Self::new();
        for descriptor in file.currencies {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Load a YAML registry from disk
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Configuration(format!(
                "Cannot read currency registry {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Add a currency, rejecting malformed or duplicate entries
    pub fn register(&mut self, descriptor: CurrencyDescriptor) -> Result<()> {
        let descriptor = CurrencyDescriptor {
            code: CurrencyCode::new(descriptor.code.as_str()),
            ..descriptor
        };
        descriptor.validate()?;

        if self.currencies.contains_key(&descriptor.code) {
            return Err(EngineError::Configuration(format!(
                "Currency {} registered twice",
                descriptor.code
            )));
        }

        self.currencies.insert(descriptor.code.clone(), descriptor);
        Ok(())
    }

    /// Descriptor for a code, or `UnknownCurrency`
    pub fn get(&self, code: &CurrencyCode) -> Result<&CurrencyDescriptor> {
        self.currencies.get(code).ok_or_else(|| {
            tracing::error!(currency = %code, "Currency missing from registry");
            EngineError::unknown_currency(code.as_str())
        })
    }

    pub fn scale_of(&self, code: &CurrencyCode) -> Result<u32> {
        self.get(code).map(|descriptor| descriptor.scale)
    }

    pub fn symbol_of(&self, code: &CurrencyCode) -> Result<&str> {
        self.get(code).map(|descriptor| descriptor.symbol.as_str())
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.currencies.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}
