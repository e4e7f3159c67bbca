use std::path::Path;

use crate::error::CatalogError;
use crate::models::{ghz_token, Catalog, ProductLineItem, StorageTier, VmTemplate};
use crate::utils::normalize_label;

/// Hardware SKUs in catalog order, skipping labor-cost entries.
fn hardware_items(catalog: &Catalog) -> impl Iterator<Item = (&ProductLineItem, String)> {
    catalog
        .items()
        .iter()
        .filter(|item| !item.is_labor())
        .map(|item| (item, normalize_label(&item.title)))
}

/// CPU product for a clock tier: title mentions "cpu" and e.g. "2ghz".
pub fn find_cpu_product(catalog: &Catalog, ghz: f64) -> Option<&ProductLineItem> {
    let token = ghz_token(ghz);
    hardware_items(catalog)
        .find(|(_, title)| title.contains("cpu") && title.contains(&token))
        .map(|(item, _)| item)
}

/// Memory product. Only one is expected; the first in catalog order wins.
pub fn find_memory_product(catalog: &Catalog) -> Option<&ProductLineItem> {
    hardware_items(catalog)
        .find(|(_, title)| title.contains("memory") || title.contains("ram"))
        .map(|(item, _)| item)
}

/// Storage product for a tier, e.g. "Storage - Premium SSD (per GB)".
pub fn find_storage_product(catalog: &Catalog, tier: StorageTier) -> Option<&ProductLineItem> {
    let tier_label = normalize_label(tier.label());
    hardware_items(catalog)
        .find(|(_, title)| title.contains("storage") && title.contains(&tier_label))
        .map(|(item, _)| item)
}

/// Items whose category or subcategory equals or contains any of `names`.
/// Labels are compared after normalization so spacing variants match.
pub fn match_by_category<'a, S: AsRef<str>>(catalog: &'a Catalog, names: &[S]) -> Vec<&'a ProductLineItem> {
    let wanted: Vec<String> = names
        .iter()
        .map(|n| normalize_label(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect();
    catalog
        .entries()
        .filter(|(_, labels)| {
            labels
                .iter()
                .any(|label| wanted.iter().any(|w| label == w || label.contains(w.as_str())))
        })
        .map(|(item, _)| item)
        .collect()
}

/// Load a catalog snapshot from a JSON array of products.
pub async fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: Catalog = serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(items = catalog.len(), path = %path.display(), "Loaded catalog file");
    Ok(catalog)
}

/// Load VM templates from a JSON array.
pub async fn load_templates_file(path: impl AsRef<Path>) -> Result<Vec<VmTemplate>, CatalogError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}
