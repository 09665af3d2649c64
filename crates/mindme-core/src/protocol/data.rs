//! Extension payload model.
//!
//! An `ExtensionData` is built fresh by the extension on every update cycle,
//! cleaned, then handed to the host. The host decodes it into a new instance;
//! nothing on the sending side retains it.

use std::any::Any;
use std::fmt;

use bytes::Bytes;

use super::locale::Locale;

/// Maximum `status_to_display` length, in UTF-16 code units.
pub const MAX_STATUS_TO_DISPLAY_LENGTH: usize = 200;
/// Maximum `status_to_speak` length, in UTF-16 code units.
pub const MAX_STATUS_TO_SPEAK_LENGTH: usize = 500;
/// Maximum `content_description` length, in UTF-16 code units.
pub const MAX_CONTENT_DESCRIPTION_LENGTH: usize =
    32 + MAX_STATUS_TO_DISPLAY_LENGTH + MAX_STATUS_TO_SPEAK_LENGTH;

/// Content URI for an icon or background image. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri(String);

impl Uri {
    /// Returns `None` for an empty string; the encodings use "" for absent.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            None
        } else {
            Some(Self(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque host-specific UI descriptor. Only the in-process container carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewsDescriptor(Bytes);

impl ViewsDescriptor {
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self(raw.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Resolved image to render: a URI wins over a resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Uri(&'a Uri),
    Resource(i32),
    None,
}

/// Data an extension asks the host to show.
///
/// A visible payload should carry at least an icon and a display status; this
/// is not enforced. Equality is structural. `Hash` is deliberately not
/// implemented: payloads are compared for change detection, never used as
/// keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionData {
    pub(crate) visible: bool,
    pub(crate) icon: i32,
    pub(crate) icon_uri: Option<Uri>,
    pub(crate) status_to_display: Option<String>,
    pub(crate) status_to_speak: Option<String>,
    pub(crate) language_to_speak: Option<Locale>,
    pub(crate) views_to_display: Option<ViewsDescriptor>,
    pub(crate) content_description: Option<String>,
    pub(crate) background: i32,
    pub(crate) background_uri: Option<Uri>,
}

impl ExtensionData {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- builder ----

    /// Whether the host should show anything for this extension.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Icon resource id in the extension's package.
    pub fn with_icon(mut self, icon: i32) -> Self {
        self.icon = icon;
        self
    }

    /// Icon URI; takes precedence over the resource id.
    pub fn with_icon_uri(mut self, uri: Uri) -> Self {
        self.icon_uri = Some(uri);
        self
    }

    pub fn with_background(mut self, background: i32) -> Self {
        self.background = background;
        self
    }

    /// Background URI; takes precedence over the resource id.
    pub fn with_background_uri(mut self, uri: Uri) -> Self {
        self.background_uri = Some(uri);
        self
    }

    /// Short status line. An empty string leaves the field absent.
    pub fn with_status_to_display(mut self, status: impl Into<String>) -> Self {
        self.status_to_display = non_empty(status.into());
        self
    }

    /// Text the host may speak. Needs `with_language_to_speak` as well.
    pub fn with_status_to_speak(mut self, status: impl Into<String>) -> Self {
        self.status_to_speak = non_empty(status.into());
        self
    }

    pub fn with_language_to_speak(mut self, locale: Locale) -> Self {
        self.language_to_speak = Some(locale);
        self
    }

    pub fn with_views_to_display(mut self, views: ViewsDescriptor) -> Self {
        self.views_to_display = Some(views);
        self
    }

    /// Accessibility label replacing the status-derived one.
    pub fn with_content_description(mut self, description: impl Into<String>) -> Self {
        self.content_description = non_empty(description.into());
        self
    }

    // ---- accessors ----

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn icon(&self) -> i32 {
        self.icon
    }

    pub fn icon_uri(&self) -> Option<&Uri> {
        self.icon_uri.as_ref()
    }

    pub fn background(&self) -> i32 {
        self.background
    }

    pub fn background_uri(&self) -> Option<&Uri> {
        self.background_uri.as_ref()
    }

    pub fn status_to_display(&self) -> Option<&str> {
        self.status_to_display.as_deref()
    }

    pub fn status_to_speak(&self) -> Option<&str> {
        self.status_to_speak.as_deref()
    }

    pub fn language_to_speak(&self) -> Option<&Locale> {
        self.language_to_speak.as_ref()
    }

    pub fn views_to_display(&self) -> Option<&ViewsDescriptor> {
        self.views_to_display.as_ref()
    }

    pub fn content_description(&self) -> Option<&str> {
        self.content_description.as_deref()
    }

    // ---- host-side helpers ----

    pub fn icon_source(&self) -> ImageSource<'_> {
        image_source(self.icon_uri.as_ref(), self.icon)
    }

    pub fn background_source(&self) -> ImageSource<'_> {
        image_source(self.background_uri.as_ref(), self.background)
    }

    /// Text and language to speak. Speech is skipped unless both are set.
    pub fn speech(&self) -> Option<(&str, &Locale)> {
        match (self.status_to_speak.as_deref(), self.language_to_speak.as_ref()) {
            (Some(text), Some(locale)) if !text.is_empty() => Some((text, locale)),
            _ => None,
        }
    }

    /// Label for accessibility services.
    pub fn accessibility_label(&self) -> Option<&str> {
        self.content_description
            .as_deref()
            .or(self.status_to_display.as_deref())
    }

    /// Equality against an arbitrary value; other types are simply not equal.
    pub fn eq_any(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<ExtensionData>()
            .is_some_and(|o| o == self)
    }

    /// Truncate text fields to their caps, keeping the prefix. Idempotent.
    pub fn clean(&mut self) {
        truncate_field(&mut self.status_to_display, MAX_STATUS_TO_DISPLAY_LENGTH);
        truncate_field(&mut self.status_to_speak, MAX_STATUS_TO_SPEAK_LENGTH);
        truncate_field(&mut self.content_description, MAX_CONTENT_DESCRIPTION_LENGTH);
    }

    /// Consuming variant of [`clean`](Self::clean).
    pub fn cleaned(mut self) -> Self {
        self.clean();
        self
    }
}

fn non_empty(s: String) -> Option<String> {
    Some(s).filter(|s| !s.is_empty())
}

fn image_source(uri: Option<&Uri>, resource: i32) -> ImageSource<'_> {
    match uri {
        Some(u) => ImageSource::Uri(u),
        None if resource != 0 => ImageSource::Resource(resource),
        None => ImageSource::None,
    }
}

fn truncate_field(field: &mut Option<String>, max_units: usize) {
    if let Some(s) = field.as_mut() {
        truncate_utf16(s, max_units);
    }
}

/// Cut `s` to at most `max_units` UTF-16 code units on a char boundary.
///
/// A surrogate pair straddling the limit is dropped whole.
pub fn truncate_utf16(s: &mut String, max_units: usize) {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            s.truncate(idx);
            return;
        }
    }
}

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn long(n: usize) -> String {
        "abcdefghij".chars().cycle().take(n).collect()
    }

    #[test]
    fn clean_truncates_to_exact_prefix() {
        let original = long(MAX_STATUS_TO_DISPLAY_LENGTH + 37);
        let data = ExtensionData::new()
            .with_status_to_display(original.clone())
            .cleaned();
        let shown = data.status_to_display().unwrap();
        assert_eq!(utf16_len(shown), MAX_STATUS_TO_DISPLAY_LENGTH);
        assert_eq!(shown, &original[..MAX_STATUS_TO_DISPLAY_LENGTH]);
    }

    #[test]
    fn clean_uses_speak_and_description_caps() {
        let data = ExtensionData::new()
            .with_status_to_speak(long(MAX_STATUS_TO_SPEAK_LENGTH + 1))
            .with_content_description(long(MAX_CONTENT_DESCRIPTION_LENGTH + 100))
            .cleaned();
        assert_eq!(data.status_to_speak().map(utf16_len), Some(500));
        assert_eq!(data.content_description().map(utf16_len), Some(732));
    }

    #[test]
    fn clean_is_idempotent() {
        let once = ExtensionData::new()
            .with_visible(true)
            .with_status_to_display(long(450))
            .with_status_to_speak(long(900))
            .with_content_description("short")
            .cleaned();
        let twice = once.clone().cleaned();
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_leaves_short_and_absent_fields() {
        let data = ExtensionData::new().with_status_to_display("72°F").cleaned();
        assert_eq!(data.status_to_display(), Some("72°F"));
        assert_eq!(data.status_to_speak(), None);
    }

    #[test]
    fn truncation_counts_utf16_units() {
        // each clef is a surrogate pair (2 units)
        let mut s = "𝄞".repeat(3);
        truncate_utf16(&mut s, 4);
        assert_eq!(s, "𝄞𝄞");
        let mut s = "𝄞".repeat(3);
        truncate_utf16(&mut s, 3);
        assert_eq!(s, "𝄞");
    }

    #[test]
    fn uri_wins_over_resource() {
        let uri = Uri::parse("content://weather/icon").unwrap();
        let data = ExtensionData::new().with_icon(7).with_icon_uri(uri.clone());
        assert_eq!(data.icon_source(), ImageSource::Uri(&uri));
        assert_eq!(
            ExtensionData::new().with_background(3).background_source(),
            ImageSource::Resource(3)
        );
        assert_eq!(ExtensionData::new().icon_source(), ImageSource::None);
    }

    #[test]
    fn speech_needs_text_and_language() {
        let text_only = ExtensionData::new().with_status_to_speak("sunny");
        assert!(text_only.speech().is_none());
        let both = text_only.with_language_to_speak(Locale::new("en", Some("US")).unwrap());
        assert_eq!(both.speech().map(|(t, _)| t), Some("sunny"));
    }

    #[test]
    fn accessibility_label_prefers_description() {
        let data = ExtensionData::new().with_status_to_display("72°F");
        assert_eq!(data.accessibility_label(), Some("72°F"));
        let data = data.with_content_description("Seventy two degrees");
        assert_eq!(data.accessibility_label(), Some("Seventy two degrees"));
    }

    #[test]
    fn equality_against_other_types_is_false() {
        let data = ExtensionData::new().with_visible(true);
        assert!(data.eq_any(&data.clone()));
        assert!(!data.eq_any(&"visible"));
        assert!(!data.eq_any(&ExtensionData::new()));
    }

    #[test]
    fn empty_text_is_absent() {
        let data = ExtensionData::new()
            .with_status_to_display("")
            .with_status_to_speak(String::new())
            .with_content_description("");
        assert_eq!(data, ExtensionData::new());
        assert!(data.accessibility_label().is_none());
    }

    #[test]
    fn empty_uri_is_absent() {
        assert!(Uri::parse("").is_none());
    }
}
