use serde::{Deserialize, Serialize};

use crate::models::{AddonSelections, VmConfiguration, WizardDraft};

/// Most VM configurations one session may hold.
pub const MAX_VMS: usize = 5;

/// Everything one customer has picked so far. Owned by the caller and passed
/// into the engine explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSession {
    #[serde(default)]
    pub vms: Vec<VmConfiguration>,
    #[serde(default)]
    pub addons: AddonSelections,
    #[serde(default)]
    pub wizard: WizardDraft,
}

impl QuoteSession {
    pub fn new() -> Self {
        QuoteSession::default()
    }

    pub fn can_create_vm(&self) -> bool {
        self.vms.len() < MAX_VMS
    }

    pub fn vm(&self, id: &str) -> Option<&VmConfiguration> {
        self.vms.iter().find(|vm| vm.id == id)
    }
}
