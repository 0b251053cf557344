//! Shared-secret API keys for trusted server-to-server callers.

use subtle::ConstantTimeEq;

use super::AuthError;

/// Authorization scheme prefix, including the single separating space.
pub const API_KEY_SCHEME: &str = "ApiKey ";

/// Pull the key out of an `Authorization: ApiKey <key>` header value.
///
/// The scheme keyword is case-sensitive.
pub fn extract_api_key(authorization: Option<&str>) -> Result<&str, AuthError> {
    authorization
        .and_then(|value| value.strip_prefix(API_KEY_SCHEME))
        .ok_or(AuthError::MissingCredential)
}

/// Exact comparison of a presented key against the configured one, in time
/// independent of where the first differing byte is.
pub fn api_key_matches(candidate: &str, configured: &str) -> bool {
    candidate.as_bytes().ct_eq(configured.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_key_after_scheme() {
        let key = extract_api_key(Some("ApiKey f271c81ff7084ee5")).unwrap();
        assert_eq!(key, "f271c81ff7084ee5");
    }

    #[test]
    fn missing_or_foreign_scheme_is_rejected() {
        let headers = [
            None,
            Some(""),
            Some("Bearer abc"),
            Some("apikey abc"),
            Some("ApiKeyabc"),
        ];
        for header in headers {
            assert!(
                matches!(extract_api_key(header), Err(AuthError::MissingCredential)),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn comparison_is_exact() {
        assert!(api_key_matches("secret", "secret"));
        assert!(!api_key_matches("secret ", "secret"));
        assert!(!api_key_matches("Secret", "secret"));
        assert!(!api_key_matches("", "secret"));
        assert!(!api_key_matches("wrong-key", "secret"));
    }
}
