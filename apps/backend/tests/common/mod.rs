#![allow(dead_code)]

// tests/common/mod.rs
use riddler::Record;
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Decode a fixture document into a record.
pub fn record(doc: Value) -> Record {
    serde_json::from_value(doc).expect("fixture should decode into a record")
}

pub fn dracula() -> Record {
    record(backend_test_support::fixtures::dracula())
}
