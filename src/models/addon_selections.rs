use serde::{Deserialize, Serialize};

use crate::models::{ProductLineItem, ServiceFamily};

/// Add-on products picked for the quote, one list per family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonSelections {
    #[serde(default)]
    pub backup_baas: Vec<ProductLineItem>,
    #[serde(default)]
    pub backup_draas: Vec<ProductLineItem>,
    #[serde(default)]
    pub licensing: Vec<ProductLineItem>,
    #[serde(default)]
    pub professional: Vec<ProductLineItem>,
    #[serde(default)]
    pub naas: Vec<ProductLineItem>,
    #[serde(default)]
    pub faas: Vec<ProductLineItem>,
    #[serde(default)]
    pub collocation: Vec<ProductLineItem>,
}

impl AddonSelections {
    pub fn for_family(&self, family: ServiceFamily) -> Option<&Vec<ProductLineItem>> {
        match family {
            ServiceFamily::VirtualMachine => None,
            ServiceFamily::Backup => Some(&self.backup_baas),
            ServiceFamily::DisasterRecovery => Some(&self.backup_draas),
            ServiceFamily::Licensing => Some(&self.licensing),
            ServiceFamily::ProfessionalServices => Some(&self.professional),
            ServiceFamily::Naas => Some(&self.naas),
            ServiceFamily::Faas => Some(&self.faas),
            ServiceFamily::Collocation => Some(&self.collocation),
        }
    }

    pub fn for_family_mut(&mut self, family: ServiceFamily) -> Option<&mut Vec<ProductLineItem>> {
        match family {
            ServiceFamily::VirtualMachine => None,
            ServiceFamily::Backup => Some(&mut self.backup_baas),
            ServiceFamily::DisasterRecovery => Some(&mut self.backup_draas),
            ServiceFamily::Licensing => Some(&mut self.licensing),
            ServiceFamily::ProfessionalServices => Some(&mut self.professional),
            ServiceFamily::Naas => Some(&mut self.naas),
            ServiceFamily::Faas => Some(&mut self.faas),
            ServiceFamily::Collocation => Some(&mut self.collocation),
        }
    }

    pub fn len(&self) -> usize {
        ServiceFamily::ADDONS
            .iter()
            .filter_map(|f| self.for_family(*f))
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        *self = AddonSelections::default();
    }
}
