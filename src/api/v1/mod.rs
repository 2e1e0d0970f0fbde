/*
 * Responsibility
 * - v1 entry point (re-export of routes())
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod protected;
mod routes;

pub use routes::routes;
