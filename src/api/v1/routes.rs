/*
 * Responsibility
 * - URL layout of the protected resources
 * - /time and /userinfo accept GET and POST; other methods get 405 from the method router
 * - Token checks happen inside each handler (api::v1::protected), not as a layer
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    time::{get_time, post_time},
    userinfo::{get_userinfo, post_userinfo},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/time", get(get_time).post(post_time))
        .route("/userinfo", get(get_userinfo).post(post_userinfo))
}
