pub mod authorization;
pub mod denial;
pub mod validator;

pub use denial::{Denial, DenialReason};
pub use validator::{AccessTokenValidator, ResourcePolicy, TokenInfo, Verdict};
