pub mod catalog_service;
pub mod pricing_service;
pub mod quote_service;
pub mod selection_service;
pub mod wizard_service;

// Re-export commonly used functions
pub use catalog_service::{
    find_cpu_product, find_memory_product, find_storage_product, load_catalog_file, load_templates_file,
    match_by_category,
};
pub use pricing_service::{compute_price, price_breakdown};
pub use quote_service::{
    add_vm, build_quote, clear_quote, delete_vm, next_vm_id, remove_line_item, select_addon, session_quote,
};
pub use wizard_service::{advance, apply_update, go_back, go_to_step, step_complete, submit};
pub use selection_service::{apply_selection, SelectionDocument, VmRequest};
