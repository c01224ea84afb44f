// Property-based tests for the minor-unit boundary
//
// Display -> minor -> display must be lossless for every amount that is
// representable at the currency's scale.

use billing_console::core::{
    CurrencyDescriptor, CurrencyRegistry, EngineError, MinorUnits, Money, MoneyNormalizer,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

proptest! {
    /// Property: to_display(to_minor_units(x)) == x for cent-precision currencies
    #[test]
    fn test_round_trip_two_decimal_currency(cents in -1_000_000_000i64..1_000_000_000i64) {
        let registry = CurrencyRegistry::with_defaults();
        let normalizer = MoneyNormalizer::new(&registry);
        let amount = Money::new(Decimal::new(cents, 2));

        let minor = normalizer.to_minor_units(amount, &"EUR".into()).unwrap();
        prop_assert_eq!(minor, MinorUnits::new(cents));
        prop_assert_eq!(normalizer.to_display(minor, &"EUR".into()).unwrap(), amount);
    }

    /// Property: zero-decimal currencies map one display unit to one minor unit
    #[test]
    fn test_round_trip_zero_decimal_currency(yen in 0i64..10_000_000_000i64) {
        let registry = CurrencyRegistry::with_defaults();
        let normalizer = MoneyNormalizer::new(&registry);
        let amount = Money::new(Decimal::from(yen));

        let minor = normalizer.to_minor_units(amount, &"JPY".into()).unwrap();
        prop_assert_eq!(minor.value(), yen);
        prop_assert_eq!(normalizer.to_display(minor, &"JPY".into()).unwrap(), amount);
    }

    /// Property: minor -> display -> minor is the identity
    #[test]
    fn test_minor_units_survive_display(minor in any::<i32>()) {
        let registry = CurrencyRegistry::with_defaults();
        let normalizer = MoneyNormalizer::new(&registry);
        let minor = MinorUnits::new(i64::from(minor));

        let display = normalizer.to_display(minor, &"USD".into()).unwrap();
        prop_assert_eq!(normalizer.to_minor_units(display, &"USD".into()).unwrap(), minor);
    }
}

#[test]
fn test_sub_minor_amounts_round_half_away_from_zero() {
    let registry = CurrencyRegistry::with_defaults();
    let normalizer = MoneyNormalizer::new(&registry);

    let cases = [
        (dec!(0.005), 1),
        (dec!(0.004), 0),
        (dec!(-0.005), -1),
        (dec!(19.995), 2000),
        (dec!(1.125), 113),
    ];
    for (display, expected) in cases {
        let minor = normalizer.to_minor_units(Money::new(display), &"EUR".into()).unwrap();
        assert_eq!(minor, MinorUnits::new(expected), "{} EUR", display);
    }

    let yen = normalizer.to_minor_units(Money::new(dec!(99.5)), &"JPY".into()).unwrap();
    assert_eq!(yen, MinorUnits::new(100));
}

#[test]
fn test_three_decimal_currency_from_registry_file() {
    let registry = CurrencyRegistry::from_yaml_str(
        "currencies:\n  - { code: KWD, scale: 1000, symbol: KD }\n",
    )
    .unwrap();
    let normalizer = MoneyNormalizer::new(&registry);

    let display = normalizer.to_display(MinorUnits::new(12_345), &"KWD".into()).unwrap();
    assert_eq!(display, Money::new(dec!(12.345)));
}

#[test]
fn test_unknown_currency_is_a_defect() {
    let registry = CurrencyRegistry::with_defaults();
    let normalizer = MoneyNormalizer::new(&registry);

    let err = normalizer.to_minor_units(Money::new(dec!(1)), &"XYZ".into()).unwrap_err();
    assert!(matches!(err, EngineError::UnknownCurrency(ref code) if code == "XYZ"));
    assert!(err.is_defect());
}

#[test]
fn test_precision_check_matches_scale() {
    let eur = CurrencyDescriptor::new("EUR", 100, "€");
    assert!(eur.validate_precision(dec!(12.34)).is_ok());
    assert!(eur.validate_precision(dec!(12.345)).is_err());

    let jpy = CurrencyDescriptor::new("JPY", 1, "¥");
    assert!(jpy.validate_precision(dec!(1200)).is_ok());
    assert!(jpy.validate_precision(dec!(1200.5)).is_err());
}
