//! Platform lookups the shell depends on but does not own.
//!
//! On a device these are answered by the OS package registry. The in-memory
//! implementation backs tests and the demo binary.

use dashmap::DashMap;

use crate::security::Signature;

/// Read-only view of installed packages.
pub trait PackageManager: Send + Sync {
    /// Packages sharing the given process uid, or `None` if the uid is unknown.
    fn packages_for_uid(&self, uid: u32) -> Option<Vec<String>>;

    /// Signing certificates of a package, or `None` if it is not installed.
    fn signatures(&self, package: &str) -> Option<Vec<Signature>>;
}

/// Package registry held in memory.
#[derive(Default)]
pub struct InMemoryPackageManager {
    uids: DashMap<u32, Vec<String>>,
    packages: DashMap<String, Vec<Signature>>,
}

impl InMemoryPackageManager {
    pub fn new() -> Self {
        Self {
            uids: DashMap::new(),
            packages: DashMap::new(),
        }
    }

    /// Register `package` under `uid` with the given signatures.
    pub fn install(&self, uid: u32, package: &str, signatures: Vec<Signature>) {
        self.uids.entry(uid).or_default().push(package.to_string());
        self.packages.insert(package.to_string(), signatures);
    }

    /// Drop a package's record while leaving its uid mapping behind.
    pub fn forget_package(&self, package: &str) {
        self.packages.remove(package);
    }
}

impl PackageManager for InMemoryPackageManager {
    fn packages_for_uid(&self, uid: u32) -> Option<Vec<String>> {
        self.uids.get(&uid).map(|r| r.value().clone())
    }

    fn signatures(&self, package: &str) -> Option<Vec<Signature>> {
        self.packages.get(package).map(|r| r.value().clone())
    }
}
