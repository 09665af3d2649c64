//! Local transfer container for in-process hand-off and saved UI state.
//!
//! Unlike the wire codec, the bundle keeps `views_to_display`. A missing
//! `visible` key decodes as `true`; the wire codec defaults to `false`.
//! Hosts that depend on one default must not feed the other codec's output
//! into it.

use std::collections::BTreeMap;

use super::data::{ExtensionData, Uri, ViewsDescriptor};
use super::locale::Locale;

pub const KEY_VISIBLE: &str = "visible";
pub const KEY_ICON: &str = "icon";
pub const KEY_ICON_URI: &str = "icon_uri";
pub const KEY_STATUS_TO_DISPLAY: &str = "status_to_display";
pub const KEY_STATUS_TO_SPEAK: &str = "status_to_speak";
pub const KEY_LANGUAGE_TO_SPEAK: &str = "language_to_speak";
pub const KEY_VIEWS_TO_DISPLAY: &str = "views_to_display";
pub const KEY_CONTENT_DESCRIPTION: &str = "content_description";
pub const KEY_BACKGROUND: &str = "background";
pub const KEY_BACKGROUND_URI: &str = "background_uri";

/// Typed bundle value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleValue {
    Bool(bool),
    Int(i32),
    /// `None` is an explicit null entry.
    Str(Option<String>),
    Locale(Option<Locale>),
    Views(Option<ViewsDescriptor>),
}

impl BundleValue {
    fn kind(&self) -> &'static str {
        match self {
            BundleValue::Bool(_) => "bool",
            BundleValue::Int(_) => "int",
            BundleValue::Str(_) => "string",
            BundleValue::Locale(_) => "locale",
            BundleValue::Views(_) => "views",
        }
    }
}

/// Key/value container with typed, default-on-miss getters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    entries: BTreeMap<String, BundleValue>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn put(&mut self, key: &str, value: BundleValue) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn put_bool(&mut self, key: &str, v: bool) {
        self.put(key, BundleValue::Bool(v));
    }

    pub fn put_int(&mut self, key: &str, v: i32) {
        self.put(key, BundleValue::Int(v));
    }

    pub fn put_string(&mut self, key: &str, v: Option<&str>) {
        self.put(key, BundleValue::Str(v.map(str::to_string)));
    }

    pub fn put_locale(&mut self, key: &str, v: Option<Locale>) {
        self.put(key, BundleValue::Locale(v));
    }

    pub fn put_views(&mut self, key: &str, v: Option<ViewsDescriptor>) {
        self.put(key, BundleValue::Views(v));
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(BundleValue::Bool(v)) => *v,
            other => self.mismatch(key, "bool", other, default),
        }
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.entries.get(key) {
            Some(BundleValue::Int(v)) => *v,
            other => self.mismatch(key, "int", other, default),
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(BundleValue::Str(v)) => v.as_deref(),
            other => self.mismatch(key, "string", other, None),
        }
    }

    pub fn get_locale(&self, key: &str) -> Option<&Locale> {
        match self.entries.get(key) {
            Some(BundleValue::Locale(v)) => v.as_ref(),
            other => self.mismatch(key, "locale", other, None),
        }
    }

    pub fn get_views(&self, key: &str) -> Option<&ViewsDescriptor> {
        match self.entries.get(key) {
            Some(BundleValue::Views(v)) => v.as_ref(),
            other => self.mismatch(key, "views", other, None),
        }
    }

    fn mismatch<T>(&self, key: &str, expected: &str, found: Option<&BundleValue>, default: T) -> T {
        if let Some(v) = found {
            tracing::warn!(key, expected, found = v.kind(), "bundle value has wrong type; using default");
        }
        default
    }
}

impl ExtensionData {
    /// Encode into a local transfer container.
    pub fn to_bundle(&self) -> Bundle {
        let mut b = Bundle::new();
        b.put_bool(KEY_VISIBLE, self.visible);
        b.put_int(KEY_ICON, self.icon);
        b.put_string(KEY_ICON_URI, self.icon_uri.as_ref().map(Uri::as_str));
        b.put_string(KEY_STATUS_TO_DISPLAY, self.status_to_display.as_deref());
        b.put_string(KEY_STATUS_TO_SPEAK, self.status_to_speak.as_deref());
        b.put_views(KEY_VIEWS_TO_DISPLAY, self.views_to_display.clone());
        b.put_string(KEY_CONTENT_DESCRIPTION, self.content_description.as_deref());
        b.put_locale(KEY_LANGUAGE_TO_SPEAK, self.language_to_speak.clone());
        b.put_int(KEY_BACKGROUND, self.background);
        b.put_string(KEY_BACKGROUND_URI, self.background_uri.as_ref().map(Uri::as_str));
        b
    }

    /// Decode from a local transfer container. Missing `visible` means visible.
    pub fn from_bundle(src: &Bundle) -> Self {
        Self {
            visible: src.get_bool(KEY_VISIBLE, true),
            icon: src.get_int(KEY_ICON, 0),
            icon_uri: src.get_string(KEY_ICON_URI).and_then(Uri::parse),
            status_to_display: src.get_string(KEY_STATUS_TO_DISPLAY).map(str::to_string),
            status_to_speak: src.get_string(KEY_STATUS_TO_SPEAK).map(str::to_string),
            language_to_speak: src.get_locale(KEY_LANGUAGE_TO_SPEAK).cloned(),
            views_to_display: src.get_views(KEY_VIEWS_TO_DISPLAY).cloned(),
            content_description: src.get_string(KEY_CONTENT_DESCRIPTION).map(str::to_string),
            background: src.get_int(KEY_BACKGROUND, 0),
            background_uri: src.get_string(KEY_BACKGROUND_URI).and_then(Uri::parse),
        }
    }
}
