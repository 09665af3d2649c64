//! Binding contract identifiers shared by extensions and hosts.

/// Action an extension service registers under so hosts can discover it.
pub const ACTION_EXTENSION: &str = "com.mindmeapp.extensions.Extension";

/// Boolean launch extra set to true when the host opens an extension's
/// settings entry point from its own settings screen.
pub const EXTRA_FROM_MINDME_SETTINGS: &str = "com.mindmeapp.extensions.extra.FROM_MINDME_SETTINGS";

/// Permission callers must hold unless the extension is world-readable.
pub const PERMISSION_READ_EXTENSION_DATA: &str =
    "com.mindmeapp.extensions.permission.READ_EXTENSION_DATA";

/// Declared protocol version that introduced the `world_readable` attribute.
pub const PROTOCOL_VERSION_WORLD_READABILITY: u32 = 1;

/// Current binary wire layout version.
pub const PARCEL_VERSION: i32 = 1;
