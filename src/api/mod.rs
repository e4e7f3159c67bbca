// Backend API modules
pub mod client;
pub mod products;
pub mod templates;
pub mod quotes;

// Re-export commonly used functions
pub use client::{api_call, envelope_data, set_silent};
pub use products::load_catalog;
pub use templates::{load_templates, templates_in_group};
pub use quotes::{deploy_quote, quote_payload, submit_quote};
