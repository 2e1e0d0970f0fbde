/*
 * Responsibility
 * - Extractor types handlers receive
 * - `None` means no usable token was found on any surface; it is never `Some("")`
 */

/// Name of the RFC 6750 §2.2 / §2.3 transport parameter.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Token of a GET request: `Authorization` header, else `?access_token=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccessToken(pub Option<String>);

/// Token of a POST request: `Authorization` header, else the
/// `access_token` field of an `application/x-www-form-urlencoded` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAccessToken(pub Option<String>);
