use serde::Serialize;

/// OpenID Connect UserInfo response (Core 1.0 §5.3.2). Only `sub` is known
/// to this server.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfoResponse {
    pub sub: String,
}
