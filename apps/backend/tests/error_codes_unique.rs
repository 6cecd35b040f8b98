use std::collections::HashSet;

use riddler::errors::ErrorCode;

#[test]
fn error_codes_are_unique() {
    let all = [
        // Keep in sync with ErrorCode enum variants
        ErrorCode::ValidationError,
        ErrorCode::MissingUserId,
        ErrorCode::GameNotInitialized,
        ErrorCode::CatalogEmpty,
        ErrorCode::PoolExhausted,
        ErrorCode::UpstreamTimeout,
        ErrorCode::UpstreamRateLimited,
        ErrorCode::UpstreamUnavailable,
        ErrorCode::ConfigError,
        ErrorCode::Internal,
    ];

    let mut seen = HashSet::new();
    for code in all {
        let s = code.as_str();
        assert!(seen.insert(s), "Duplicate error code string: {s}");
        assert_eq!(s, s.to_ascii_uppercase(), "codes are SCREAMING_SNAKE_CASE: {s}");
    }
}
