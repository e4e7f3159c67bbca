use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::utils::lenient_number;

/// Memory sizes offered in custom build mode.
pub const CUSTOM_MEMORY_OPTIONS_GB: [u32; 17] =
    [4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 60, 64, 128];

/// Clock tiers with known fallback rates.
pub const CLOCK_TIERS_GHZ: [u32; 2] = [1, 2];

pub const VCPU_RANGE: RangeInclusive<u32> = 1..=32;
pub const STORAGE_RANGE_GB: RangeInclusive<u32> = 10..=2000;

/// Storage performance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StorageTier {
    #[default]
    #[serde(rename = "Standard SSD", alias = "standard")]
    StandardSsd,
    #[serde(rename = "Premium SSD", alias = "premium")]
    PremiumSsd,
}

impl StorageTier {
    pub const ALL: [StorageTier; 2] = [StorageTier::StandardSsd, StorageTier::PremiumSsd];

    pub fn label(&self) -> &'static str {
        match self {
            StorageTier::StandardSsd => "Standard SSD",
            StorageTier::PremiumSsd => "Premium SSD",
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StorageTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = crate::utils::normalize_label(s);
        match t.as_str() {
            "standard ssd" | "standard" => Ok(StorageTier::StandardSsd),
            "premium ssd" | "premium" => Ok(StorageTier::PremiumSsd),
            _ => Err(format!("unknown storage tier: {}", s.trim())),
        }
    }
}

/// Clock tier as it appears in catalog titles, e.g. `"2ghz"`.
pub fn ghz_token(ghz: f64) -> String {
    if ghz.fract() == 0.0 {
        format!("{}ghz", ghz as i64)
    } else {
        format!("{}ghz", ghz)
    }
}

fn missing() -> f64 {
    f64::NAN
}

/// A requested VM configuration. Numeric fields accept numeric strings;
/// anything else decodes as `NaN` and leaves the spec incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VmSpec {
    #[serde(default = "missing", deserialize_with = "lenient_number")]
    pub vcpus: f64,
    #[serde(rename = "memoryGB", default = "missing", deserialize_with = "lenient_number")]
    pub memory_gb: f64,
    #[serde(rename = "storageGB", default = "missing", deserialize_with = "lenient_number")]
    pub storage_gb: f64,
    #[serde(rename = "clockGHz", default = "missing", deserialize_with = "lenient_number")]
    pub clock_ghz: f64,
    #[serde(default)]
    pub tier: StorageTier,
}

impl VmSpec {
    pub fn new(vcpus: f64, memory_gb: f64, storage_gb: f64, clock_ghz: f64, tier: StorageTier) -> Self {
        VmSpec {
            vcpus,
            memory_gb,
            storage_gb,
            clock_ghz,
            tier,
        }
    }

    /// A spec with nothing filled in yet.
    pub fn empty() -> Self {
        VmSpec::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN, StorageTier::default())
    }

    /// All four quantities are finite and strictly positive.
    pub fn is_complete(&self) -> bool {
        [self.vcpus, self.memory_gb, self.storage_gb, self.clock_ghz]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Complete and drawn from the custom-build option sets: whole vCPUs in
    /// [`VCPU_RANGE`], memory from [`CUSTOM_MEMORY_OPTIONS_GB`], storage in
    /// [`STORAGE_RANGE_GB`] and a clock from [`CLOCK_TIERS_GHZ`].
    pub fn is_custom_option(&self) -> bool {
        fn whole(v: f64) -> Option<u32> {
            (v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX)).then(|| v as u32)
        }
        if !self.is_complete() {
            return false;
        }
        let vcpus_ok = whole(self.vcpus).map_or(false, |v| VCPU_RANGE.contains(&v));
        let memory_ok = whole(self.memory_gb).map_or(false, |m| CUSTOM_MEMORY_OPTIONS_GB.contains(&m));
        let storage_ok = self.storage_gb >= f64::from(*STORAGE_RANGE_GB.start())
            && self.storage_gb <= f64::from(*STORAGE_RANGE_GB.end());
        let clock_ok = whole(self.clock_ghz).map_or(false, |c| CLOCK_TIERS_GHZ.contains(&c));
        vcpus_ok && memory_ok && storage_ok && clock_ok
    }

    pub fn ghz_token(&self) -> String {
        ghz_token(self.clock_ghz)
    }
}

impl Default for VmSpec {
    fn default() -> Self {
        VmSpec::empty()
    }
}
