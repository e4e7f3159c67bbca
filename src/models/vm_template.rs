use serde::{Deserialize, Serialize};

use crate::models::{StorageTier, VmSpec};
use crate::utils::{lenient_id, lenient_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateGroup {
    Small,
    Medium,
    Large,
}

/// A predefined VM shape used to pre-fill specs in template build mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmTemplate {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub group: TemplateGroup,
    #[serde(default)]
    pub os_type: String,
    #[serde(rename = "type", default)]
    pub tier: StorageTier,
    #[serde(deserialize_with = "lenient_number")]
    pub vcpus: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub memory: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub storage: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub ghz: f64,
    #[serde(default)]
    pub description: String,
}

impl VmTemplate {
    /// Specs copied from the template. The storage tier comes from the
    /// wizard's tier step, which may differ from the template's default.
    pub fn to_spec(&self, tier: StorageTier) -> VmSpec {
        VmSpec::new(self.vcpus, self.memory, self.storage, self.ghz, tier)
    }
}
