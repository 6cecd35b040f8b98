use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regex patterns for credential redaction.
///
/// All patterns are literals known to compile; each construction site
/// carries a single allow.
pub struct SecretRegexRegistry;

impl SecretRegexRegistry {
    /// `key=` / `api_key=` query parameters, as embedded in upstream URLs
    /// and therefore in transport error messages.
    pub fn key_query_param() -> &'static Regex {
        static KEY_PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?i)([?&](?:api_)?key=)[^&\s)]+").unwrap()
        });
        &KEY_PARAM_REGEX
    }

    /// Google-style API keys (`AIza` followed by 35 url-safe characters).
    pub fn google_api_key() -> &'static Regex {
        static GOOGLE_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\bAIza[0-9A-Za-z_\-]{35}\b").unwrap()
        });
        &GOOGLE_KEY_REGEX
    }
}

/// Masks credentials in free-form text.
///
/// Query-parameter values go first so the parameter name stays readable,
/// then any bare key that is still left.
pub fn redact(input: &str) -> String {
    let params = SecretRegexRegistry::key_query_param().replace_all(input, "${1}[REDACTED]");
    SecretRegexRegistry::google_api_key()
        .replace_all(&params, "[REDACTED_KEY]")
        .to_string()
}

/// Short, non-reversible label for a credential: its first four
/// characters followed by an ellipsis.
pub fn fingerprint(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}…")
}

/// Redacts the wrapped string when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}
