pub mod auth;
pub mod introspection;
