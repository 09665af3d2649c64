//! Binary wire codec for cross-process transfer (panic-free).
//!
//! Primitive layout, little-endian, every item aligned to 4 bytes:
//! - `int`: i32.
//! - `string`: i32 length in UTF-16 code units (`-1` = null), the code units,
//!   a u16 terminator, zero padding.
//! - `blob`: i32 byte length (`-1` = null), the bytes, zero padding.
//!
//! Payload: `int` version, then the version 1 fields in a fixed order.
//! Fields may only ever be appended. Readers skip whatever a newer writer
//! appended after the fields they know.
//!
//! Parsing rules:
//! - Never index raw buffers; always check `remaining()` through `Buf`.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ExtensionError, Result};

use super::contract::PARCEL_VERSION;
use super::data::{ExtensionData, Uri};
use super::locale::Locale;

const NULL_LEN: i32 = -1;

/// Append-only writer for parcel primitives.
#[derive(Debug, Default)]
pub struct ParcelWriter {
    buf: BytesMut,
}

impl ParcelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.put_i32_le(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_i32(i32::from(v));
    }

    /// Write a nullable string.
    pub fn write_string(&mut self, s: Option<&str>) {
        let Some(s) = s else {
            self.write_i32(NULL_LEN);
            return;
        };
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_len(units.len());
        for u in &units {
            self.buf.put_u16_le(*u);
        }
        self.buf.put_u16_le(0);
        self.pad((units.len() + 1) * 2);
    }

    /// Write a nullable opaque byte blob.
    pub fn write_blob(&mut self, b: Option<&[u8]>) {
        let Some(b) = b else {
            self.write_i32(NULL_LEN);
            return;
        };
        self.write_len(b.len());
        self.buf.put_slice(b);
        self.pad(b.len());
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }

    fn write_len(&mut self, len: usize) {
        // Payload fields are capped far below i32::MAX; saturate rather than wrap.
        self.write_i32(i32::try_from(len).unwrap_or(i32::MAX));
    }

    fn pad(&mut self, written: usize) {
        let rem = written % 4;
        if rem != 0 {
            self.buf.put_bytes(0, 4 - rem);
        }
    }
}

/// Cursor over parcel primitives. Every read is bounds-checked.
#[derive(Debug)]
pub struct ParcelReader {
    buf: Bytes,
}

impl ParcelReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        if self.buf.remaining() < 4 {
            return Err(ExtensionError::BadPayload("parcel truncated: missing i32".into()));
        }
        Ok(self.buf.get_i32_le())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_i32()? != 0)
    }

    /// Read a nullable string.
    pub fn read_string(&mut self) -> Result<Option<String>> {
        let Some(len) = self.read_len()? else {
            return Ok(None);
        };
        let byte_len = (len + 1) * 2;
        self.need(byte_len + pad_len(byte_len), "string")?;

        let mut units = Vec::with_capacity(len);
        for _ in 0..len {
            units.push(self.buf.get_u16_le());
        }
        if self.buf.get_u16_le() != 0 {
            return Err(ExtensionError::BadPayload("parcel string missing terminator".into()));
        }
        self.buf.advance(pad_len(byte_len));

        String::from_utf16(&units)
            .map(Some)
            .map_err(|_| ExtensionError::BadPayload("parcel string is not valid UTF-16".into()))
    }

    /// Read a nullable blob.
    pub fn read_blob(&mut self) -> Result<Option<Bytes>> {
        let Some(len) = self.read_len()? else {
            return Ok(None);
        };
        self.need(len + pad_len(len), "blob")?;
        let out = self.buf.copy_to_bytes(len);
        self.buf.advance(pad_len(len));
        Ok(Some(out))
    }

    fn read_len(&mut self) -> Result<Option<usize>> {
        match self.read_i32()? {
            NULL_LEN => Ok(None),
            n if n < 0 => Err(ExtensionError::BadPayload(format!("parcel negative length: {n}"))),
            n => Ok(Some(n as usize)),
        }
    }

    fn need(&self, n: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(ExtensionError::BadPayload(format!(
                "parcel truncated: {what} needs {n} bytes, {} left",
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}

fn pad_len(n: usize) -> usize {
    (4 - n % 4) % 4
}

/// Encode a payload in the current wire layout.
///
/// The views slot is always written as null: UI descriptors do not cross
/// process boundaries.
pub fn encode_parcel(data: &ExtensionData) -> Bytes {
    let mut w = ParcelWriter::new();
    w.write_i32(PARCEL_VERSION);

    // Version 1 below
    w.write_bool(data.visible);
    w.write_i32(data.icon);
    w.write_string(Some(data.icon_uri.as_ref().map_or("", Uri::as_str)));
    w.write_string(Some(data.status_to_display.as_deref().unwrap_or("")));
    w.write_string(Some(data.status_to_speak.as_deref().unwrap_or("")));
    w.write_string(data.language_to_speak.as_ref().map(Locale::to_string).as_deref());
    w.write_blob(None);
    w.write_string(Some(data.content_description.as_deref().unwrap_or("")));
    w.write_i32(data.background);
    w.write_string(Some(data.background_uri.as_ref().map_or("", Uri::as_str)));

    w.finish()
}

/// Decode a payload. Newer versions are accepted; their extra fields are skipped.
pub fn decode_parcel(buf: Bytes) -> Result<ExtensionData> {
    let mut r = ParcelReader::new(buf);

    let version = r.read_i32()?;
    if version < 1 {
        return Err(ExtensionError::UnsupportedVersion(version));
    }

    let visible = r.read_bool()?;
    let icon = r.read_i32()?;
    let icon_uri = r.read_string()?.as_deref().and_then(Uri::parse);
    let status_to_display = non_empty(r.read_string()?);
    let status_to_speak = non_empty(r.read_string()?);
    let language_to_speak = r.read_string()?.as_deref().and_then(Locale::parse);
    if let Some(views) = r.read_blob()? {
        tracing::debug!(len = views.len(), "parcel carried a views descriptor; dropped");
    }
    let content_description = non_empty(r.read_string()?);
    let background = r.read_i32()?;
    let background_uri = r.read_string()?.as_deref().and_then(Uri::parse);

    if r.remaining() > 0 {
        tracing::trace!(version, skipped = r.remaining(), "ignoring trailing parcel fields");
    }

    Ok(ExtensionData {
        visible,
        icon,
        icon_uri,
        status_to_display,
        status_to_speak,
        language_to_speak,
        views_to_display: None,
        content_description,
        background,
        background_uri,
    })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
