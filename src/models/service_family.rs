use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::normalize_label;

/// Service families a quote line item can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceFamily {
    VirtualMachine,
    Backup,
    DisasterRecovery,
    Licensing,
    ProfessionalServices,
    Naas,
    Faas,
    Collocation,
}

impl ServiceFamily {
    /// Families that are sold as add-ons next to virtual machines, in the
    /// order the quote lists them.
    pub const ADDONS: [ServiceFamily; 7] = [
        ServiceFamily::Backup,
        ServiceFamily::DisasterRecovery,
        ServiceFamily::Licensing,
        ServiceFamily::ProfessionalServices,
        ServiceFamily::Naas,
        ServiceFamily::Faas,
        ServiceFamily::Collocation,
    ];

    /// Catalog category labels (already normalized) that identify the family.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            ServiceFamily::VirtualMachine => &["virtual machines", "virtual machine"],
            ServiceFamily::Backup => &["backup-as-a-service", "backup as a service"],
            ServiceFamily::DisasterRecovery => &[
                "disaster-recovery-as-a-service",
                "disaster recovery as a service",
            ],
            ServiceFamily::Licensing => &["m365", "microsoft 365", "licensing"],
            ServiceFamily::ProfessionalServices => &["professional services"],
            ServiceFamily::Naas => &["network-as-a-service", "network as a service"],
            ServiceFamily::Faas => &["firewall-as-a-service", "firewall as a service"],
            ServiceFamily::Collocation => &["collocation", "colocation"],
        }
    }

    pub fn is_addon(&self) -> bool {
        !matches!(self, ServiceFamily::VirtualMachine)
    }

    /// Resolve the family of a free-text category label. Disaster recovery is
    /// checked before backup since DR offerings often mention backups too.
    pub fn from_label(raw: &str) -> Option<ServiceFamily> {
        let label = normalize_label(raw);
        if label.is_empty() {
            return None;
        }
        const ORDER: [ServiceFamily; 8] = [
            ServiceFamily::DisasterRecovery,
            ServiceFamily::Backup,
            ServiceFamily::Licensing,
            ServiceFamily::ProfessionalServices,
            ServiceFamily::Naas,
            ServiceFamily::Faas,
            ServiceFamily::Collocation,
            ServiceFamily::VirtualMachine,
        ];
        ORDER
            .into_iter()
            .find(|family| family.labels().iter().any(|l| label.contains(l)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceFamily::VirtualMachine => "vm",
            ServiceFamily::Backup => "baas",
            ServiceFamily::DisasterRecovery => "draas",
            ServiceFamily::Licensing => "licensing",
            ServiceFamily::ProfessionalServices => "professional",
            ServiceFamily::Naas => "naas",
            ServiceFamily::Faas => "faas",
            ServiceFamily::Collocation => "collocation",
        }
    }
}

impl fmt::Display for ServiceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vm" | "virtualmachine" | "virtual-machine" => Ok(ServiceFamily::VirtualMachine),
            "baas" | "backup" => Ok(ServiceFamily::Backup),
            "draas" | "dr" | "disaster-recovery" => Ok(ServiceFamily::DisasterRecovery),
            "licensing" | "m365" => Ok(ServiceFamily::Licensing),
            "professional" | "ps" => Ok(ServiceFamily::ProfessionalServices),
            "naas" | "network" => Ok(ServiceFamily::Naas),
            "faas" | "firewall" => Ok(ServiceFamily::Faas),
            "collocation" | "colocation" => Ok(ServiceFamily::Collocation),
            other => Err(format!("unknown service family: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_double_spaced_labels() {
        assert_eq!(
            ServiceFamily::from_label("Cloud Services -  Backup-as-a-Service"),
            Some(ServiceFamily::Backup)
        );
        assert_eq!(
            ServiceFamily::from_label("Cloud Services - Backup-as-a-Service"),
            Some(ServiceFamily::Backup)
        );
    }

    #[test]
    fn disaster_recovery_wins_over_backup() {
        assert_eq!(
            ServiceFamily::from_label("Cloud Services - Disaster Recovery as a Service (backup replicas)"),
            Some(ServiceFamily::DisasterRecovery)
        );
    }

    #[test]
    fn unknown_labels_have_no_family() {
        assert_eq!(ServiceFamily::from_label("Hardware"), None);
        assert_eq!(ServiceFamily::from_label("   "), None);
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("FaaS".parse::<ServiceFamily>(), Ok(ServiceFamily::Faas));
        assert!("nope".parse::<ServiceFamily>().is_err());
    }
}
