use serde::{Deserialize, Serialize};

use crate::models::{ServiceFamily, VmConfiguration};

pub const DEFAULT_UNIT: &str = "month";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItemType {
    #[serde(rename = "virtualMachine")]
    VirtualMachine,
}

/// Nested payload carried by VM line items (`details.configuration.specs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmDetails {
    pub configuration: VmConfiguration,
}

/// A flattened, priced quote entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub units: u32,
    pub unit: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LineItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<VmDetails>,
    /// Selection family the item came from; not part of the backend schema.
    #[serde(skip)]
    pub family: Option<ServiceFamily>,
}

impl QuoteLineItem {
    pub fn is_vm(&self) -> bool {
        self.kind == Some(LineItemType::VirtualMachine)
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.units)
    }
}

/// Ordered, deduplicated line items and their total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub items: Vec<QuoteLineItem>,
    pub total_cost: f64,
}

impl Quote {
    pub fn empty() -> Self {
        Quote::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: &str) -> Option<&QuoteLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn vm_items(&self) -> impl Iterator<Item = &QuoteLineItem> {
        self.items.iter().filter(|i| i.is_vm())
    }

    pub fn addon_items(&self) -> impl Iterator<Item = &QuoteLineItem> {
        self.items.iter().filter(|i| !i.is_vm())
    }
}
