//! Problem Details assertions
//!
//! Checks the serialized error body handed to the web layer without
//! depending on backend types.

use serde::Deserialize;
use serde_json::Value;

/// Local mirror of the backend's problem-details body.
#[derive(Debug, Deserialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
}

/// Assert that `body` conforms to the stable error contract:
/// the expected code and status, a `type` URI ending in the code, and
/// non-empty title and detail.
pub fn assert_problem_details(body: &Value, expected_code: &str, expected_status: u16) {
    let pd: ProblemDetailsLike = serde_json::from_value(body.clone())
        .unwrap_or_else(|e| panic!("not a problem-details body ({e}): {body}"));

    assert_eq!(pd.code, expected_code, "unexpected code in {body}");
    assert_eq!(pd.status, expected_status, "unexpected status in {body}");
    assert!(
        pd.type_.ends_with(expected_code),
        "type {} should end with {expected_code}",
        pd.type_
    );
    assert!(!pd.title.is_empty(), "title must not be empty");
    assert!(!pd.detail.is_empty(), "detail must not be empty");
}
