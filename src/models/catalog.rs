use serde::{Deserialize, Serialize, Serializer};

use crate::models::{ProductLineItem, ServiceFamily};
use crate::utils::normalize_label;

/// Immutable snapshot of the product catalog.
///
/// Category labels are normalized and each item's [`ServiceFamily`] is
/// resolved once, when the snapshot is built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<ProductLineItem>")]
pub struct Catalog {
    items: Vec<ProductLineItem>,
    /// Normalized category/subcategory labels, index-aligned with `items`.
    labels: Vec<Vec<String>>,
}

impl Catalog {
    pub fn new(items: Vec<ProductLineItem>) -> Self {
        let mut items = items;
        let mut labels = Vec::with_capacity(items.len());
        for item in items.iter_mut() {
            let normalized: Vec<String> = item
                .category_labels()
                .map(normalize_label)
                .filter(|l| !l.is_empty())
                .collect();
            item.family = normalized.iter().find_map(|l| ServiceFamily::from_label(l));
            labels.push(normalized);
        }
        Catalog { items, labels }
    }

    pub fn items(&self) -> &[ProductLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProductLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Items paired with their normalized labels, in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&ProductLineItem, &[String])> {
        self.items
            .iter()
            .zip(self.labels.iter().map(Vec::as_slice))
    }

    pub fn in_family(&self, family: ServiceFamily) -> impl Iterator<Item = &ProductLineItem> {
        self.items.iter().filter(move |i| i.family == Some(family))
    }
}

impl From<Vec<ProductLineItem>> for Catalog {
    fn from(items: Vec<ProductLineItem>) -> Self {
        Catalog::new(items)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_families_on_ingestion() {
        let catalog = Catalog::new(vec![
            ProductLineItem::new("b1", "Veeam Backup 1TB")
                .with_category("Cloud Services -  Backup-as-a-Service"),
            ProductLineItem::new("f1", "Managed Firewall")
                .with_category("Cloud Services")
                .with_sub_category("Firewall as a Service"),
            ProductLineItem::new("x", "Misc"),
        ]);
        assert_eq!(catalog.get("b1").unwrap().family, Some(ServiceFamily::Backup));
        assert_eq!(catalog.get("f1").unwrap().family, Some(ServiceFamily::Faas));
        assert_eq!(catalog.get("x").unwrap().family, None);
        assert_eq!(catalog.in_family(ServiceFamily::Faas).count(), 1);
    }

    #[test]
    fn decodes_from_plain_array() {
        let catalog: Catalog = serde_json::from_str(
            r#"[{"id": "n1", "title": "SD-WAN", "price": 120, "categoryName": "Network as a Service"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.items()[0].family, Some(ServiceFamily::Naas));
        let out = serde_json::to_value(&catalog).unwrap();
        assert!(out.is_array());
    }
}
