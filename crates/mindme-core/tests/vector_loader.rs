//! Wire codec test vectors: a framed payload plus the decoded fields or the
//! error code it must produce.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::path::Path;

use base64::Engine;
use serde::Deserialize;

use mindme_core::ExtensionData;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParcelVector {
    pub description: String,
    pub frame: Frame,
    #[serde(default)]
    expect: Option<serde_json::Value>,
    #[serde(default)]
    expect_error: Option<ExpectedError>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectedError {
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Hex,
    Base64,
}

#[derive(Debug, Deserialize)]
pub struct Frame {
    pub encoding: Encoding,
    pub data: String,
}

pub enum Expectation {
    Data(ExtensionData),
    Error(String),
}

impl Frame {
    pub fn bytes(&self) -> Vec<u8> {
        match self.encoding {
            Encoding::Hex => hex::decode(&self.data).expect("bad hex frame"),
            Encoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(&self.data)
                .expect("bad base64 frame"),
        }
    }
}

impl ParcelVector {
    /// Load `tests/vectors/<name>`.
    pub fn load(name: &str) -> Self {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/vectors")
            .join(name);
        let s = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        serde_json::from_str(&s).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
    }

    /// Expected fields are written in the interchange JSON shape.
    pub fn expectation(&self) -> Expectation {
        match (&self.expect, &self.expect_error) {
            (Some(v), None) => Expectation::Data(
                ExtensionData::from_json(v.clone()).expect("expect block is not valid data"),
            ),
            (None, Some(e)) => Expectation::Error(e.code.clone()),
            _ => panic!("{}: need exactly one of expect / expect_error", self.description),
        }
    }
}
