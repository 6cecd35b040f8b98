//! Logging helpers. The embedding process owns the subscriber; this module
//! only keeps secrets out of emitted events.

pub mod redact;

pub use redact::{fingerprint, redact, Redacted};
