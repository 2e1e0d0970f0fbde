/*
 * Responsibility
 * - Router-wide middleware (re-export)
 * - Token checks are NOT middleware here: each protected handler runs them (api::v1::protected)
 */
pub mod cors;
pub mod http;
pub mod security_headers;
