use serde::{Deserialize, Serialize};

/// Where a price leg came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum PriceSource {
    Catalog {
        #[serde(rename = "productId")]
        product_id: String,
    },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLeg {
    pub amount: f64,
    #[serde(flatten)]
    pub source: PriceSource,
}

impl PriceLeg {
    pub fn is_fallback(&self) -> bool {
        self.source == PriceSource::Fallback
    }
}

/// Monthly price of one VM spec, per component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub cpu: PriceLeg,
    pub memory: PriceLeg,
    pub storage: PriceLeg,
    pub total: f64,
}

impl PriceBreakdown {
    pub fn used_fallback(&self) -> bool {
        self.cpu.is_fallback() || self.memory.is_fallback() || self.storage.is_fallback()
    }
}
