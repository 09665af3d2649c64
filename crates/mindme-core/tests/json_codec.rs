//! Interchange encoding tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use mindme_core::protocol::{Locale, Uri, ViewsDescriptor};
use mindme_core::ExtensionData;

fn sample() -> ExtensionData {
    ExtensionData::new()
        .with_visible(true)
        .with_icon(7)
        .with_icon_uri(Uri::parse("content://weather/sun").unwrap())
        .with_status_to_display("72°F")
        .with_status_to_speak("Seventy two degrees")
        .with_language_to_speak(Locale::new("en", Some("GB")).unwrap())
        .with_content_description("Weather")
        .with_background(9)
        .with_background_uri(Uri::parse("content://weather/bg").unwrap())
}

#[test]
fn round_trip_through_string() {
    let data = sample();
    let back = ExtensionData::from_json_str(&data.to_json_string()).unwrap();
    assert_eq!(back, data);
}

#[test]
fn locale_is_split_into_two_keys() {
    let v = sample().to_json();
    assert_eq!(v["locale_language"], "en");
    assert_eq!(v["locale_country"], "GB");
    assert!(v.get("language_to_speak").is_none());
}

#[test]
fn language_only_locale() {
    let v = json!({ "status_to_speak": "Hallo", "locale_language": "de" });
    let data = ExtensionData::from_json(v).unwrap();
    assert_eq!(data.language_to_speak(), Locale::language_only("de").as_ref());

    let v = json!({ "locale_language": "de", "locale_country": "" });
    let data = ExtensionData::from_json(v).unwrap();
    assert_eq!(data.language_to_speak().and_then(|l| l.country()), None);
}

#[test]
fn views_are_not_carried() {
    let data = sample().with_views_to_display(ViewsDescriptor::new(vec![1, 2, 3]));
    let v = data.to_json();
    assert!(v.get("views_to_display").is_none());
    let back = ExtensionData::from_json(v).unwrap();
    assert!(back.views_to_display().is_none());
    assert_eq!(back, sample());
}

#[test]
fn absent_fields_round_trip_as_absent() {
    let back = ExtensionData::from_json(ExtensionData::new().to_json()).unwrap();
    assert_eq!(back, ExtensionData::new());
    assert!(back.icon_uri().is_none());
    assert!(back.status_to_display().is_none());
    assert!(back.language_to_speak().is_none());
}

#[test]
fn missing_fields_default_leniently() {
    let data = ExtensionData::from_json(json!({})).unwrap();
    assert!(!data.visible());
    assert_eq!(data.icon(), 0);

    let data = ExtensionData::from_json(json!({ "status_to_display": "", "icon_uri": null })).unwrap();
    assert!(data.status_to_display().is_none());
    assert!(data.icon_uri().is_none());
}

#[test]
fn unknown_keys_are_ignored() {
    let data = ExtensionData::from_json(json!({ "visible": true, "added_in_v9": [1, 2] })).unwrap();
    assert!(data.visible());
}

#[test]
fn convertible_values_are_coerced() {
    let v = json!({
        "visible": "TRUE",
        "icon": "7",
        "background": 3.9,
        "status_to_display": 72,
        "status_to_speak": true,
        "icon_uri": "content://weather/sun",
    });
    let data = ExtensionData::from_json(v).unwrap();
    assert!(data.visible());
    assert_eq!(data.icon(), 7);
    assert_eq!(data.background(), 3);
    assert_eq!(data.status_to_display(), Some("72"));
    assert_eq!(data.status_to_speak(), Some("true"));
    assert_eq!(data.icon_uri().map(Uri::as_str), Some("content://weather/sun"));

    let data = ExtensionData::from_json(json!({ "visible": "false", "icon": " -12.7 " })).unwrap();
    assert!(!data.visible());
    assert_eq!(data.icon(), -12);
}

#[test]
fn integers_follow_32_bit_cast_rules() {
    let data = ExtensionData::from_json(json!({ "icon": 4_294_967_303_i64, "background": 1e12 })).unwrap();
    assert_eq!(data.icon(), 7);
    assert_eq!(data.background(), i32::MAX);
}

#[test]
fn unconvertible_values_default_silently() {
    let v = json!({
        "visible": "yes",
        "icon": "seven",
        "background": [1],
        "status_to_display": null,
        "locale_language": "zh-hant",
    });
    let data = ExtensionData::from_json(v).unwrap();
    assert_eq!(data, ExtensionData::new());

    let data = ExtensionData::from_json(json!({ "visible": 1, "status_to_speak": { "a": 1 } })).unwrap();
    assert!(!data.visible());
    assert_eq!(data.status_to_speak(), Some(r#"{"a":1}"#));
}

#[test]
fn only_non_objects_and_bad_text_are_rejected() {
    for v in [json!([1, 2, 3]), json!("visible"), json!(null), json!(7)] {
        let err = ExtensionData::from_json(v.clone()).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_PAYLOAD", "input={v}");
    }

    let err = ExtensionData::from_json_str("{ not json").unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_PAYLOAD");
}
