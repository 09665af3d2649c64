//! Signing certificates and the trusted-certificate allowlist.

use std::fmt;

use mindme_core::error::{ExtensionError, Result};

/// A package signing certificate (DER bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn new(der: impl Into<Vec<u8>>) -> Self {
        Self(der.into())
    }

    /// Parse hex, ignoring whitespace so long certificates can be wrapped.
    pub fn from_hex(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ExtensionError::InvalidConfig("empty signature".into()));
        }
        hex::decode(&compact)
            .map(Self)
            .map_err(|e| ExtensionError::InvalidConfig(format!("invalid signature hex: {e}")))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // certificates are long; the tail is enough to tell them apart in logs
        let tail = &self.0[self.0.len().saturating_sub(4)..];
        write!(f, "Signature({} bytes, ..{})", self.0.len(), hex::encode(tail))
    }
}

/// Fixed set of certificates whose holders may bind without world-readability.
#[derive(Debug, Clone, Default)]
pub struct TrustedSignatures {
    set: Vec<Signature>,
}

impl TrustedSignatures {
    pub fn new(set: Vec<Signature>) -> Self {
        Self { set }
    }

    pub fn compile(raw: &[String]) -> Result<Self> {
        let mut out = Vec::with_capacity(raw.len());
        for (i, s) in raw.iter().enumerate() {
            let sig = Signature::from_hex(s).map_err(|e| {
                ExtensionError::InvalidConfig(format!("trust.signatures[{i}]: {e}"))
            })?;
            if !out.contains(&sig) {
                out.push(sig);
            }
        }
        Ok(Self { set: out })
    }

    pub fn contains(&self, sig: &Signature) -> bool {
        self.set.iter().any(|s| s == sig)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.set.iter()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn hex_allows_wrapping() {
        let a = Signature::from_hex("30 82\n02d1").unwrap();
        assert_eq!(a.as_bytes(), &[0x30, 0x82, 0x02, 0xd1]);
    }

    #[test]
    fn compile_rejects_bad_entries() {
        let err = TrustedSignatures::compile(&["3082".into(), "zz".into()]).unwrap_err();
        assert!(err.to_string().contains("trust.signatures[1]"));
        assert!(TrustedSignatures::compile(&["  ".into()]).is_err());
    }

    #[test]
    fn compile_dedups() {
        let t = TrustedSignatures::compile(&["abcd".into(), "AB CD".into()]).unwrap();
        assert_eq!(t.len(), 1);
        assert!(t.contains(&Signature::new(vec![0xab, 0xcd])));
    }
}
