use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{BuildMode, StorageTier, VmSpec};

/// Steps of the VM creation wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    #[default]
    Region,
    Build,
    Tier,
    Os,
    Name,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Region,
        WizardStep::Build,
        WizardStep::Tier,
        WizardStep::Os,
        WizardStep::Name,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        WizardStep::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.index() + 1)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Region => "region",
            WizardStep::Build => "template/custom",
            WizardStep::Tier => "tier",
            WizardStep::Os => "os",
            WizardStep::Name => "name & description",
        };
        f.write_str(name)
    }
}

/// In-progress VM being assembled by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardDraft {
    pub step: WizardStep,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub build_mode: BuildMode,
    #[serde(default)]
    pub template_id: Option<String>,
    /// Specs entered in custom mode; the tier field is ignored in favour of
    /// [`WizardDraft::tier`].
    #[serde(default)]
    pub custom_specs: VmSpec,
    #[serde(default)]
    pub tier: Option<StorageTier>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub description: String,
}

impl Default for WizardDraft {
    fn default() -> Self {
        WizardDraft {
            step: WizardStep::Region,
            region: None,
            build_mode: BuildMode::Template,
            template_id: None,
            custom_specs: VmSpec::empty(),
            tier: None,
            os: None,
            server_name: String::new(),
            description: String::new(),
        }
    }
}

/// Partial update of the draft's fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardUpdate {
    pub region: Option<String>,
    pub build_mode: Option<BuildMode>,
    pub template_id: Option<String>,
    pub custom_specs: Option<VmSpec>,
    pub tier: Option<StorageTier>,
    pub os: Option<String>,
    pub server_name: Option<String>,
    pub description: Option<String>,
}

/// Outcome of a step change request. A rejected move leaves the draft as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Transition {
    Moved { step: WizardStep },
    Rejected {
        step: WizardStep,
        #[serde(rename = "blockedBy")]
        blocked_by: WizardStep,
    },
}

impl Transition {
    pub fn is_moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}
