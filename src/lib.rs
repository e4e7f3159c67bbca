//! Pricing and quote engine for virtual machines and add-on cloud services.
//!
//! The engine prices a VM specification against a product catalog snapshot,
//! drives the five-step VM creation wizard and assembles VMs plus add-on
//! selections (backup, DR, licensing, professional services, networking,
//! firewall, collocation) into one deduplicated, totaled quote.
//!
//! ```
//! use vmquote::models::{Catalog, StorageTier, VmSpec};
//! use vmquote::services::compute_price;
//!
//! let spec = VmSpec::new(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd);
//! // No catalog products: every component uses its fallback rate.
//! let price = compute_price(&spec, &Catalog::default());
//! assert!((price - 1400.0).abs() < 1e-9);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;
