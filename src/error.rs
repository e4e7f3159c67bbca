/// Error types for the pricing and quote engine
use thiserror::Error;

use crate::models::WizardStep;

/// Errors raised by engine operations that the caller must act on.
///
/// Incomplete specs priced through [`crate::services::compute_price`],
/// duplicate line items and rejected wizard moves are not errors.
#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    /// The session already holds the maximum number of VMs
    #[error("VM limit reached: at most {limit} configurations per quote")]
    VmLimitReached { limit: usize },

    /// vCPUs, memory, storage or clock speed missing or not positive
    #[error("VM specification is incomplete")]
    IncompleteSpec,

    /// CPU pricing fell back to the hardcoded rates, which only cover 1 and 2 GHz
    #[error("No CPU price for {0} GHz: catalog has no matching product and no fallback rate exists")]
    UnsupportedClockTier(f64),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    /// Product exists but belongs to no add-on family
    #[error("Product is not an add-on service: {0}")]
    NotAnAddon(String),

    /// Submit attempted while a wizard step is still unsatisfied
    #[error("Wizard step not complete: {0}")]
    WizardIncomplete(WizardStep),
}

/// Errors from the backend API collaborators.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Backend answered with a non-OKAY envelope
    #[error("Backend rejected request ({code}): {detail}")]
    Rejected { code: String, detail: String },

    #[error("Response missing field: {0}")]
    MissingField(&'static str),
}

/// Errors loading catalog or template files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
