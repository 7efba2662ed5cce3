use chrono::TimeZone;
use chrono::Utc;
use rust_decimal::Decimal;

use finchart::core::Candle;

#[test]
fn candle_from_decimal_time_is_supported() {
    let time = Utc
        .timestamp_opt(1_700_000_100, 0)
        .single()
        .expect("valid ts");
    let candle = Candle::from_decimal_time(
        time,
        Decimal::new(1000, 1),
        Decimal::new(1200, 1),
        Decimal::new(900, 1),
        Decimal::new(1100, 1),
    )
    .expect("candle");

    assert!((candle.time - 1_700_000_100.0).abs() <= 1e-6);
    assert!((candle.open - 100.0).abs() <= 1e-9);
    assert!((candle.high - 120.0).abs() <= 1e-9);
    assert!((candle.low - 90.0).abs() <= 1e-9);
    assert!((candle.close - 110.0).abs() <= 1e-9);
}

#[test]
fn candle_with_inverted_range_is_rejected() {
    let time = Utc
        .timestamp_opt(1_700_000_100, 0)
        .single()
        .expect("valid ts");
    let result = Candle::from_decimal_time(
        time,
        Decimal::new(1000, 1),
        Decimal::new(900, 1),
        Decimal::new(1200, 1),
        Decimal::new(1100, 1),
    );

    assert!(result.is_err());
}

#[test]
fn candle_rejects_non_finite_fields() {
    assert!(Candle::new(0.0, f64::NAN, 1.0, 0.0, 0.5).is_err());
    assert!(Candle::new(f64::INFINITY, 0.5, 1.0, 0.0, 0.5).is_err());
}

#[test]
fn parsed_candles_are_validated() {
    let inverted = r#"{"time":1.0,"open":10.0,"high":9.0,"low":11.0,"close":10.0}"#;
    assert!(serde_json::from_str::<Candle>(inverted).is_err());

    let candle: Candle =
        serde_json::from_str(r#"{"time":1.0,"open":10.0,"high":12.0,"low":9.0,"close":11.0}"#)
            .expect("valid candle");
    assert_eq!(candle.close, 11.0);
}
