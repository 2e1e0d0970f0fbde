//! `Authorization` header parsing for access tokens (RFC 6750 §2.1, RFC 9449 §7.1).
//!
//! Two explicit steps: `DPoP <token>` first, then `Bearer <token>`. The scheme
//! keyword is case-insensitive, whitespace between keyword and token is
//! optional, the token is a single run of non-whitespace characters, and
//! trailing whitespace is ignored. Empty captures never come back as a token.

const DPOP: &str = "DPoP";
const BEARER: &str = "Bearer";

/// Extract the access token from a raw `Authorization` header value.
pub fn extract_access_token(authorization: Option<&str>) -> Option<String> {
    let value = authorization.filter(|v| !v.is_empty())?;

    extract_dpop_token(value).or_else(|| extract_bearer_token(value))
}

pub fn extract_dpop_token(value: &str) -> Option<String> {
    match_scheme(value, DPOP)
}

pub fn extract_bearer_token(value: &str) -> Option<String> {
    match_scheme(value, BEARER)
}

/// Pick the header token if there is one, otherwise the transport parameter.
pub fn locate(header_token: Option<String>, parameter: Option<String>) -> Option<String> {
    header_token
        .filter(|t| !t.is_empty())
        .or_else(|| parameter.filter(|t| !t.is_empty()))
}

fn match_scheme(value: &str, scheme: &str) -> Option<String> {
    // `get` instead of slicing: a multi-byte char may straddle the keyword length.
    let keyword = value.get(..scheme.len())?;
    if !keyword.eq_ignore_ascii_case(scheme) {
        return None;
    }

    let token = value[scheme.len()..].trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(value: &str) -> Option<String> {
        extract_access_token(Some(value))
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract("Bearer abc.def"), Some("abc.def".into()));
    }

    #[test]
    fn dpop_token_is_extracted() {
        assert_eq!(
            extract("DPoP Kz~8mXK1EalYznwH-LC-1fBAo.4Ljp~zsPE_NeO.gxU"),
            Some("Kz~8mXK1EalYznwH-LC-1fBAo.4Ljp~zsPE_NeO.gxU".into())
        );
    }

    #[test]
    fn keyword_is_case_insensitive() {
        assert_eq!(extract("bearer t1"), Some("t1".into()));
        assert_eq!(extract("BEARER t1"), Some("t1".into()));
        assert_eq!(extract("dpop t2"), Some("t2".into()));
    }

    #[test]
    fn interior_and_trailing_whitespace_is_tolerated() {
        assert_eq!(extract("Bearer    t1"), Some("t1".into()));
        assert_eq!(extract("Bearer\tt1  "), Some("t1".into()));
        assert_eq!(extract("DPoP \t t2\t"), Some("t2".into()));
    }

    #[test]
    fn whitespace_after_keyword_is_optional() {
        assert_eq!(extract("Bearert1"), Some("t1".into()));
    }

    #[test]
    fn empty_capture_is_absent() {
        assert_eq!(extract("Bearer "), None);
        assert_eq!(extract("Bearer"), None);
        assert_eq!(extract("DPoP    "), None);
    }

    #[test]
    fn more_than_one_token_does_not_match() {
        assert_eq!(extract("Bearer a b"), None);
    }

    #[test]
    fn leading_whitespace_does_not_match() {
        assert_eq!(extract(" Bearer t1"), None);
    }

    #[test]
    fn other_schemes_fall_through() {
        assert_eq!(extract("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract("token"), None);
        assert_eq!(extract_access_token(Some("")), None);
        assert_eq!(extract_access_token(None), None);
    }

    #[test]
    fn multibyte_values_do_not_panic() {
        assert_eq!(extract("Béarer t1"), None);
        assert_eq!(extract("日本語"), None);
    }

    #[test]
    fn dpop_and_bearer_steps_are_independent() {
        assert_eq!(extract_dpop_token("Bearer t1"), None);
        assert_eq!(extract_bearer_token("DPoP t1"), None);
        assert_eq!(extract_dpop_token("DPoP t1"), Some("t1".into()));
    }

    #[test]
    fn header_wins_over_parameter() {
        assert_eq!(
            locate(Some("from-header".into()), Some("from-param".into())),
            Some("from-header".into())
        );
    }

    #[test]
    fn parameter_is_used_when_header_yields_nothing() {
        assert_eq!(
            locate(extract_access_token(Some("Bearer ")), Some("p".into())),
            Some("p".into())
        );
        assert_eq!(locate(None, Some("p".into())), Some("p".into()));
    }

    #[test]
    fn empty_parameter_is_absent() {
        assert_eq!(locate(None, Some(String::new())), None);
        assert_eq!(locate(None, None), None);
    }
}
