use std::sync::Arc;

use mindme_core::error::ExtensionError;

use crate::platform::PackageManager;

use super::signature::TrustedSignatures;

/// Why a caller was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No package owns the calling uid.
    NoPackage,
    /// The first package vanished between lookups.
    PackageNotFound(String),
    /// Zero or several signing certificates.
    SignatureCount { package: String, count: usize },
    /// A single certificate that is not in the trusted set.
    Untrusted(String),
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NoPackage => "no_package",
            Rejection::PackageNotFound(_) => "package_not_found",
            Rejection::SignatureCount { .. } => "signature_count",
            Rejection::Untrusted(_) => "untrusted",
        }
    }
}

/// Checks that a binding caller is signed with a trusted certificate.
#[derive(Clone)]
pub struct CallerVerifier {
    trusted: TrustedSignatures,
    packages: Arc<dyn PackageManager>,
}

impl CallerVerifier {
    pub fn new(trusted: TrustedSignatures, packages: Arc<dyn PackageManager>) -> Self {
        Self { trusted, packages }
    }

    /// Classify the caller. Only the first package of a shared uid is checked.
    pub fn check(&self, uid: u32) -> Result<String, Rejection> {
        let package = self
            .packages
            .packages_for_uid(uid)
            .and_then(|p| p.into_iter().next())
            .ok_or(Rejection::NoPackage)?;

        let sigs = self
            .packages
            .signatures(&package)
            .ok_or_else(|| Rejection::PackageNotFound(package.clone()))?;

        match sigs.as_slice() {
            [only] if self.trusted.contains(only) => Ok(package),
            [_] => Err(Rejection::Untrusted(package)),
            _ => Err(Rejection::SignatureCount {
                package,
                count: sigs.len(),
            }),
        }
    }

    /// Log a rejection and build the access-denied error returned to the caller.
    pub fn deny(&self, uid: u32, rejection: &Rejection) -> ExtensionError {
        tracing::error!(
            uid,
            reason = rejection.as_str(),
            detail = ?rejection,
            "caller is not a trusted host and this extension is not world-readable"
        );
        ExtensionError::SecurityDenied(format!(
            "caller uid {uid} is not a trusted host ({}) and this extension is not world-readable",
            rejection.as_str()
        ))
    }
}
