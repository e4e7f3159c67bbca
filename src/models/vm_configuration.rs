use serde::{Deserialize, Serialize};

use crate::models::{StorageTier, VmSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Template,
    Custom,
}

/// A VM created by the wizard and held in the working quote.
///
/// `monthly_price` is computed once at creation and never refreshed, so a
/// catalog reload mid-session does not reprice existing VMs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmConfiguration {
    pub id: String,
    pub region: String,
    pub os: String,
    pub tier: StorageTier,
    pub server_name: String,
    #[serde(default)]
    pub description: String,
    pub build_mode: BuildMode,
    pub specs: VmSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub monthly_price: f64,
}

impl VmConfiguration {
    /// One-line shape summary, e.g. `4 vCPU / 16 GB / 100 GB Premium SSD @ 2GHz`.
    pub fn summary(&self) -> String {
        format!(
            "{} vCPU / {} GB / {} GB {} @ {}GHz",
            self.specs.vcpus, self.specs.memory_gb, self.specs.storage_gb, self.tier, self.specs.clock_ghz
        )
    }
}
