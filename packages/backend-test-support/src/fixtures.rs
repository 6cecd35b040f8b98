//! Sample catalog documents.
//!
//! Plain `serde_json` values so this crate stays independent of the backend
//! types; tests decode them into records.

use serde_json::{json, Value};

pub fn dracula() -> Value {
    json!({
        "_id": "64b0c0ffee0000000000d001",
        "CHARACTER": "Dracula",
        "SOURCE": "Dracula (1897) by Bram Stoker",
        "PORTRAYED_BY": "Bela Lugosi",
        "IS_MALE": "Yes",
        "IS_HUMAN": "No",
        "PRIMARY_COLORS": "Black, Red",
        "WEAPON": "Fangs"
    })
}

pub fn annabelle() -> Value {
    json!({
        "_id": "64b0c0ffee0000000000d002",
        "CHARACTER": "Annabelle",
        "SOURCE": "The Conjuring (2013)",
        "IS_MALE": "No",
        "IS_HUMAN": "No",
        "PRIMARY_COLORS": "White",
        "WEAPON": "Possession"
    })
}

pub fn pennywise() -> Value {
    json!({
        "_id": "64b0c0ffee0000000000d003",
        "CHARACTER": "Pennywise",
        "SOURCE": "It (1986) by Stephen King",
        "PORTRAYED_BY": "Tim Curry",
        "IS_MALE": "Yes",
        "IS_HUMAN": "No",
        "PRIMARY_COLORS": "White, Red",
        "WEAPON": "Fear"
    })
}

/// Three-entry catalog as a JSON array.
pub fn catalog() -> Value {
    Value::Array(vec![dracula(), annabelle(), pennywise()])
}

/// `n` generated entries, each with a unique display name.
pub fn numbered_catalog(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "_id": format!("gen-{i}"),
                    "CHARACTER": format!("Entity {i}"),
                    "SOURCE": "Generated",
                    "IS_MALE": if i % 2 == 0 { "Yes" } else { "No" },
                })
            })
            .collect(),
    )
}
