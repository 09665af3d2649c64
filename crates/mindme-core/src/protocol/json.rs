//! Interchange (JSON) encoding.
//!
//! Same keys as the bundle, minus `views_to_display`, with the locale split
//! into `locale_language` / `locale_country`. Absent fields are omitted on
//! encode.
//!
//! Decoding is lenient per field:
//! - booleans accept `true`/`false` or those words as strings (any case)
//! - integers accept numbers (fractions truncate, out-of-range saturates or
//!   wraps like a 32-bit cast) or numeric strings
//! - strings accept any scalar or nested value, rendered as text
//!
//! Anything else falls back to the field default. Only non-object input and
//! unparseable text are errors.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ExtensionError, Result};

use super::bundle::{
    KEY_BACKGROUND, KEY_BACKGROUND_URI, KEY_CONTENT_DESCRIPTION, KEY_ICON, KEY_ICON_URI,
    KEY_STATUS_TO_DISPLAY, KEY_STATUS_TO_SPEAK, KEY_VISIBLE,
};
use super::data::{ExtensionData, Uri};
use super::locale::Locale;

pub const KEY_LOCALE_LANGUAGE: &str = "locale_language";
pub const KEY_LOCALE_COUNTRY: &str = "locale_country";

/// Encoded shape. Field names match the `KEY_*` constants.
#[derive(Debug, Serialize)]
struct JsonData<'a> {
    visible: bool,
    icon: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_to_display: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_to_speak: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_description: Option<&'a str>,
    background: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale_language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale_country: Option<&'a str>,
}

impl ExtensionData {
    /// Encode as a JSON object. `views_to_display` is not carried.
    pub fn to_json(&self) -> Value {
        let locale = self.language_to_speak.as_ref();
        let shape = JsonData {
            visible: self.visible,
            icon: self.icon,
            icon_uri: self.icon_uri.as_ref().map(Uri::as_str),
            status_to_display: self.status_to_display.as_deref(),
            status_to_speak: self.status_to_speak.as_deref(),
            content_description: self.content_description.as_deref(),
            background: self.background,
            background_uri: self.background_uri.as_ref().map(Uri::as_str),
            locale_language: locale.map(Locale::language),
            locale_country: locale.and_then(Locale::country),
        };
        // A struct of plain scalars always serializes.
        serde_json::to_value(shape).unwrap_or(Value::Null)
    }

    /// Decode from a JSON value. Fails only if `value` is not an object.
    pub fn from_json(value: Value) -> Result<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(ExtensionError::BadPayload(format!(
                    "extension data must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let language_to_speak = opt_string(&obj, KEY_LOCALE_LANGUAGE).and_then(|lang| {
            let country = opt_string(&obj, KEY_LOCALE_COUNTRY);
            let locale = Locale::new(&lang, country.as_deref());
            if locale.is_none() {
                tracing::debug!(language = %lang, "unusable locale language in JSON; dropped");
            }
            locale
        });

        Ok(Self {
            visible: opt_bool(&obj, KEY_VISIBLE),
            icon: opt_i32(&obj, KEY_ICON),
            icon_uri: opt_string(&obj, KEY_ICON_URI).as_deref().and_then(Uri::parse),
            status_to_display: opt_string(&obj, KEY_STATUS_TO_DISPLAY),
            status_to_speak: opt_string(&obj, KEY_STATUS_TO_SPEAK),
            language_to_speak,
            views_to_display: None,
            content_description: opt_string(&obj, KEY_CONTENT_DESCRIPTION),
            background: opt_i32(&obj, KEY_BACKGROUND),
            background_uri: opt_string(&obj, KEY_BACKGROUND_URI).as_deref().and_then(Uri::parse),
        })
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(value)
    }
}

fn opt_bool(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => true,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => false,
        None | Some(Value::Null) => false,
        Some(other) => {
            coercion_failed(key, other, "bool");
            false
        }
    }
}

fn opt_i32(obj: &Map<String, Value>, key: &str) -> i32 {
    let coerced = match obj.get(key) {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(n)) => number_to_i32(n),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i32),
        Some(_) => None,
    };
    coerced.unwrap_or_else(|| {
        if let Some(v) = obj.get(key) {
            coercion_failed(key, v, "int");
        }
        0
    })
}

/// Integers keep their low 32 bits; floats truncate toward zero and saturate.
fn number_to_i32(n: &serde_json::Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        Some(i as i32)
    } else if let Some(u) = n.as_u64() {
        Some(u as i32)
    } else {
        n.as_f64().map(|f| f as i32)
    }
}

/// Text form of any present value. `null` and `""` are absent.
fn opt_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

fn coercion_failed(key: &str, got: &Value, want: &str) {
    tracing::debug!(key, got = json_kind(got), want, "JSON field not convertible; default used");
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
