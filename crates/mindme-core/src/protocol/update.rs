//! Update reasons passed from the host with each update request.

/// Why the host asked for fresh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum UpdateReason {
    /// Unknown trigger; treat like a periodic refresh.
    #[default]
    Unknown = 0,
    /// The user explicitly asked for a refresh.
    Manual = 1,
    /// Regular refresh on the host's cadence.
    Periodic = 2,
    /// Extension settings may have changed.
    SettingsChanged = 3,
}

impl UpdateReason {
    /// Decode an IPC reason code. Codes from newer hosts map to `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => UpdateReason::Manual,
            2 => UpdateReason::Periodic,
            3 => UpdateReason::SettingsChanged,
            _ => UpdateReason::Unknown,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateReason::Unknown => "unknown",
            UpdateReason::Manual => "manual",
            UpdateReason::Periodic => "periodic",
            UpdateReason::SettingsChanged => "settings_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        for reason in [
            UpdateReason::Unknown,
            UpdateReason::Manual,
            UpdateReason::Periodic,
            UpdateReason::SettingsChanged,
        ] {
            assert_eq!(UpdateReason::from_code(reason.code()), reason);
        }
        assert_eq!(UpdateReason::Periodic.code(), 2);
    }

    #[test]
    fn future_codes_fall_back_to_unknown() {
        assert_eq!(UpdateReason::from_code(42), UpdateReason::Unknown);
        assert_eq!(UpdateReason::from_code(-1), UpdateReason::Unknown);
    }
}
