/*!
 * Access token extractor
 *
 * Responsibility:
 * - Locate the candidate access token of a request (header, then parameter)
 * - HTTP / axum details live in core, the extractor types in types
 *
 * Public API:
 * - GetAccessToken  (Authorization header, else `access_token` query parameter)
 * - PostAccessToken (Authorization header, else `access_token` form field)
 */

mod core;
mod types;

pub use types::{GetAccessToken, PostAccessToken};
