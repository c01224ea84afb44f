//! Monetary value types and the minor-unit boundary.
//!
//! Two types keep wire amounts and display amounts apart:
//!
//! - [`MinorUnits`]: integer amount as stored and transmitted (cents for EUR)
//! - [`Money`]: decimal display amount (`12.34`), the only type the
//!   calculator, state machine and refund workflow operate on
//!
//! [`MoneyNormalizer`] is the one place that converts between them. Its
//! `to_display` accepts only `MinorUnits`, so normalizing an amount that is
//! already in display units does not compile.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

use crate::core::{CurrencyCode, CurrencyRegistry, EngineError, Result};

/// Integer amount in a currency's smallest unit, as it crosses the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    #[inline]
    pub const fn new(amount: i64) -> Self {
        MinorUnits(amount)
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-unit amount that has already been normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Builds an amount from integer hundredths (`3570` is `35.70`)
    #[inline]
    pub fn from_hundredths(hundredths: i64) -> Self {
        Money(Decimal::new(hundredths, 2))
    }

    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds half away from zero to `places` fractional digits
    pub fn round_half_up(&self, places: u32) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Value in integer hundredths, rounded half away from zero
    ///
    /// `None` when the amount does not fit in an i64 of hundredths.
    pub fn to_hundredths(&self) -> Option<i64> {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|hundredths| hundredths.to_i64())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Converts amounts across the wire boundary using the injected registry
#[derive(Debug, Clone, Copy)]
pub struct MoneyNormalizer<'a> {
    registry: &'a CurrencyRegistry,
}

impl<'a> MoneyNormalizer<'a> {
    pub fn new(registry: &'a CurrencyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a CurrencyRegistry {
        self.registry
    }

    /// `amount / scale(currency)`
    ///
    /// ```
    /// use billing_console::core::{CurrencyCode, CurrencyRegistry, MinorUnits, MoneyNormalizer};
    ///
    /// let registry = CurrencyRegistry::with_defaults();
    /// let normalizer = MoneyNormalizer::new(&registry);
    /// let eur = CurrencyCode::new("EUR");
    ///
    /// let display = normalizer.to_display(MinorUnits::new(1234), &eur).unwrap();
    /// assert_eq!(display.to_string(), "12.34");
    /// ```
    ///
    /// A display amount cannot be normalized a second time:
    ///
    /// ```compile_fail
    /// use billing_console::core::{CurrencyCode, CurrencyRegistry, MinorUnits, MoneyNormalizer};
    ///
    /// let registry = CurrencyRegistry::with_defaults();
    /// let normalizer = MoneyNormalizer::new(&registry);
    /// let eur = CurrencyCode::new("EUR");
    ///
    /// let display = normalizer.to_display(MinorUnits::new(1234), &eur).unwrap();
    /// let twice = normalizer.to_display(display, &eur);
    /// ```
    pub fn to_display(&self, amount: MinorUnits, currency: &CurrencyCode) -> Result<Money> {
        let descriptor = self.registry.get(currency)?;
        Ok(Money(Decimal::new(amount.value(), descriptor.decimal_places())))
    }

    /// `round(amount * scale(currency))`, half away from zero
    pub fn to_minor_units(&self, amount: Money, currency: &CurrencyCode) -> Result<MinorUnits> {
        let descriptor = self.registry.get(currency)?;
        amount
            .amount()
            .checked_mul(Decimal::from(descriptor.scale))
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|scaled| scaled.to_i64())
            .map(MinorUnits)
            .ok_or_else(|| {
                EngineError::invalid_amount(format!(
                    "{} {} does not fit in minor units",
                    amount, currency
                ))
            })
    }

    pub fn to_display_opt(
        &self,
        amount: Option<MinorUnits>,
        currency: &CurrencyCode,
    ) -> Result<Option<Money>> {
        amount.map(|a| self.to_display(a, currency)).transpose()
    }

    pub fn to_minor_units_opt(
        &self,
        amount: Option<Money>,
        currency: &CurrencyCode,
    ) -> Result<Option<MinorUnits>> {
        amount.map(|a| self.to_minor_units(a, currency)).transpose()
    }
}
