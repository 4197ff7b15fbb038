// Middleware module - contains CORS and observability setup

pub mod cors;
pub mod observability;

// Re-export for convenience
pub use cors::{create_cors_layer, create_custom_cors_layer};
pub use observability::{LogFormat, init_tracing};
