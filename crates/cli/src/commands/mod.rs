pub mod lifecycle;
pub mod serve_gateway;
pub mod smart_config;
pub mod validate;
