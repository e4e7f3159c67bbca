use serde::{Deserialize, Serialize};

use crate::models::ServiceFamily;
use crate::utils::{lenient_amount, lenient_id};

/// Title fragments that mark labor-cost entries. They share words like "CPU"
/// or "storage" with real SKUs and must never be matched as hardware.
const LABOR_MARKERS: [&str; 2] = ["engineer", "manager"];

/// A priced catalog entry as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLineItem {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Wholesale cost.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub cost: f64,
    /// Resale price.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    /// Markup percentage in `0..100`.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub profit: f64,
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, alias = "subCategory", skip_serializing_if = "Option::is_none")]
    pub sub_category_name: Option<String>,
    /// Resolved when the item enters a [`crate::models::Catalog`].
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub family: Option<ServiceFamily>,
}

impl ProductLineItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        ProductLineItem {
            id: id.into(),
            title: title.into(),
            cost: 0.0,
            price: 0.0,
            profit: 0.0,
            category_name: None,
            sub_category_name: None,
            family: None,
        }
    }

    pub fn with_cost(mut self, cost: f64, profit: f64) -> Self {
        self.cost = cost;
        self.profit = profit;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_name = Some(category.into());
        self
    }

    pub fn with_sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category_name = Some(sub_category.into());
        self
    }

    pub fn title_lower(&self) -> String {
        self.title.to_lowercase()
    }

    pub fn is_labor(&self) -> bool {
        let title = self.title_lower();
        LABOR_MARKERS.iter().any(|m| title.contains(m))
    }

    /// Category then subcategory label, whichever are present.
    pub fn category_labels(&self) -> impl Iterator<Item = &str> {
        self.category_name
            .as_deref()
            .into_iter()
            .chain(self.sub_category_name.as_deref())
    }

    /// Sell price grossed up from cost: `cost / (1 - profit/100)`.
    ///
    /// `None` when the markup is outside `0..100` or the cost is negative,
    /// since either would yield an infinite or negative price.
    pub fn sell_price(&self) -> Option<f64> {
        if !(0.0..100.0).contains(&self.profit) || !self.cost.is_finite() || self.cost < 0.0 {
            return None;
        }
        Some(self.cost / (1.0 - self.profit / 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grosses_up_cost_by_margin() {
        let item = ProductLineItem::new("cpu-2", "vCPU 2GHz").with_cost(20.0, 60.0);
        let sell = item.sell_price().unwrap();
        assert!((sell - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_full_margin() {
        let item = ProductLineItem::new("x", "CPU 1GHz").with_cost(10.0, 100.0);
        assert_eq!(item.sell_price(), None);
    }

    #[test]
    fn detects_labor_items() {
        assert!(ProductLineItem::new("e", "Storage Engineer (hourly)").is_labor());
        assert!(ProductLineItem::new("m", "CPU capacity Manager").is_labor());
        assert!(!ProductLineItem::new("s", "Storage Premium SSD").is_labor());
    }

    #[test]
    fn decodes_string_amounts() {
        let raw = r#"{"id": 17, "title": "Memory (GB)", "cost": "12.5", "price": null, "profit": "60", "categoryName": "Cloud Services - Virtual Machines"}"#;
        let item: ProductLineItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.id, "17");
        assert_eq!(item.cost, 12.5);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.profit, 60.0);
        assert_eq!(item.family, None);
    }
}
