// Parsing utilities
pub mod parse_number;
pub mod normalize_label;

// Formatting utilities
pub mod format_money;

// Re-export all utilities for convenient access
pub use parse_number::{lenient_amount, lenient_id, lenient_number, parse_number, value_to_number};
pub use normalize_label::normalize_label;
pub use format_money::format_money;
