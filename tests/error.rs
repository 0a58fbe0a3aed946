//! Tests for error module

use holematch::error::{HoleMatchError, OptionExt};

#[test]
fn test_error_display() {
    let err = HoleMatchError::IndexOutOfRange { index: 7, len: 3 };
    assert_eq!(err.to_string(), "index 7 out of range for 3 stamps");

    let err = HoleMatchError::HoleWithoutPins {
        hole_id: "12".to_string(),
    };
    assert!(err.to_string().contains("'12'"));

    let err = HoleMatchError::InvalidConfig {
        field: "tee_threshold",
        value: -2.0,
    };
    assert!(err.to_string().contains("tee_threshold = -2"));
}

#[test]
fn test_json_error_conversion() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("[1, 2");
    let err: HoleMatchError = parse.unwrap_err().into();
    assert!(matches!(err, HoleMatchError::Json(_)));
    assert!(err.to_string().starts_with("json: "));
}

#[test]
fn test_option_ext() {
    let none: Option<i32> = None;
    assert!(matches!(
        none.ok_or_empty_stamps(),
        Err(HoleMatchError::EmptyStamps)
    ));
    assert!(matches!(
        none.ok_or_no_pins("3"),
        Err(HoleMatchError::HoleWithoutPins { hole_id }) if hole_id == "3"
    ));
    assert_eq!(Some(5).ok_or_empty_stamps().unwrap(), 5);
}
