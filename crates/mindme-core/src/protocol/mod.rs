//! Protocol modules: the payload model and its three encodings.
//!
//! - `parcel`: versioned binary wire format for cross-process transfer.
//! - `bundle`: typed key/value container for in-process hand-off.
//! - `json`: interchange encoding for debugging and tooling.
//!
//! Decoders are panic-free: malformed input is reported as `ExtensionError`
//! instead of panicking or indexing raw buffers.

pub mod bundle;
pub mod contract;
pub mod data;
pub mod json;
pub mod locale;
pub mod parcel;
pub mod update;

pub use data::{ExtensionData, ImageSource, Uri, ViewsDescriptor};
pub use locale::Locale;
pub use update::UpdateReason;
