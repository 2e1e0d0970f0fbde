pub mod client;
pub mod factory;
pub mod rfc7662;

#[cfg(test)]
pub mod testing;

pub use client::{
    IntrospectionAction, IntrospectionRequest, IntrospectionResponse, Introspector,
};
pub use factory::build_introspector;
pub use rfc7662::HttpIntrospector;
