use crate::error::QuoteError;
use crate::models::{Catalog, PriceBreakdown, PriceLeg, PriceSource, StorageTier, VmSpec};
use crate::services::catalog_service::{find_cpu_product, find_memory_product, find_storage_product};

/// Margin baked into the fallback CPU and memory rates.
pub const FALLBACK_MARGIN: f64 = 0.60;
/// Wholesale monthly cost per vCPU at 1 GHz when the catalog has no CPU SKU.
pub const FALLBACK_CPU_COST_1GHZ: f64 = 30.98;
/// Wholesale monthly cost per vCPU at 2 GHz when the catalog has no CPU SKU.
pub const FALLBACK_CPU_COST_2GHZ: f64 = 61.97;
/// Wholesale monthly cost per GB of memory when the catalog has no memory SKU.
pub const FALLBACK_MEMORY_COST_PER_GB: f64 = 50.0;
pub const FALLBACK_STANDARD_SSD_PER_GB: f64 = 1.80;
pub const FALLBACK_PREMIUM_SSD_PER_GB: f64 = 2.75;

fn fallback_cpu_rate(clock_ghz: f64) -> Option<f64> {
    let cost = if clock_ghz == 1.0 {
        FALLBACK_CPU_COST_1GHZ
    } else if clock_ghz == 2.0 {
        FALLBACK_CPU_COST_2GHZ
    } else {
        return None;
    };
    Some(cost / (1.0 - FALLBACK_MARGIN))
}

fn fallback_storage_rate(tier: StorageTier) -> f64 {
    match tier {
        StorageTier::PremiumSsd => FALLBACK_PREMIUM_SSD_PER_GB,
        StorageTier::StandardSsd => FALLBACK_STANDARD_SSD_PER_GB,
    }
}

fn cpu_leg(spec: &VmSpec, catalog: &Catalog) -> Result<PriceLeg, QuoteError> {
    if let Some(product) = find_cpu_product(catalog, spec.clock_ghz) {
        if let Some(rate) = product.sell_price() {
            return Ok(PriceLeg {
                amount: (rate * spec.vcpus).ceil(),
                source: PriceSource::Catalog { product_id: product.id.clone() },
            });
        }
        tracing::warn!(product_id = %product.id, profit = product.profit, "CPU product has an unusable margin; ignoring it");
    }
    let rate = fallback_cpu_rate(spec.clock_ghz).ok_or(QuoteError::UnsupportedClockTier(spec.clock_ghz))?;
    tracing::warn!(clock_ghz = spec.clock_ghz, "No usable CPU product in catalog; using fallback rate");
    Ok(PriceLeg {
        amount: (spec.vcpus * rate).ceil(),
        source: PriceSource::Fallback,
    })
}

fn memory_leg(spec: &VmSpec, catalog: &Catalog) -> PriceLeg {
    if let Some(product) = find_memory_product(catalog) {
        if let Some(rate) = product.sell_price() {
            return PriceLeg {
                amount: (rate * spec.memory_gb).ceil(),
                source: PriceSource::Catalog { product_id: product.id.clone() },
            };
        }
        tracing::warn!(product_id = %product.id, profit = product.profit, "Memory product has an unusable margin; ignoring it");
    }
    tracing::warn!("No usable memory product in catalog; using fallback rate");
    PriceLeg {
        amount: (spec.memory_gb * (FALLBACK_MEMORY_COST_PER_GB / (1.0 - FALLBACK_MARGIN))).ceil(),
        source: PriceSource::Fallback,
    }
}

/// Storage uses the catalog resale price as is and is not rounded.
fn storage_leg(spec: &VmSpec, catalog: &Catalog) -> PriceLeg {
    if let Some(product) = find_storage_product(catalog, spec.tier) {
        if product.price.is_finite() && product.price >= 0.0 {
            return PriceLeg {
                amount: product.price * spec.storage_gb,
                source: PriceSource::Catalog { product_id: product.id.clone() },
            };
        }
        tracing::warn!(product_id = %product.id, price = product.price, "Storage product has an unusable price; ignoring it");
    }
    tracing::warn!(tier = %spec.tier, "No usable storage product in catalog; using fallback rate");
    PriceLeg {
        amount: spec.storage_gb * fallback_storage_rate(spec.tier),
        source: PriceSource::Fallback,
    }
}

/// Monthly price of `spec`, per component.
///
/// CPU and memory are each rounded up to a whole currency unit; storage is
/// left as is and the total is the plain sum.
pub fn price_breakdown(spec: &VmSpec, catalog: &Catalog) -> Result<PriceBreakdown, QuoteError> {
    if !spec.is_complete() {
        return Err(QuoteError::IncompleteSpec);
    }
    let cpu = cpu_leg(spec, catalog)?;
    let memory = memory_leg(spec, catalog);
    let storage = storage_leg(spec, catalog);
    let total = cpu.amount + memory.amount + storage.amount;
    tracing::debug!(
        total,
        cpu = cpu.amount,
        memory = memory.amount,
        storage = storage.amount,
        "Priced VM spec"
    );
    Ok(PriceBreakdown {
        cpu,
        memory,
        storage,
        total,
    })
}

/// Monthly price of `spec`, or `0.0` when it cannot be priced.
///
/// Never fails: an incomplete spec or a clock tier with neither a catalog
/// product nor a fallback rate both yield zero.
pub fn compute_price(spec: &VmSpec, catalog: &Catalog) -> f64 {
    match price_breakdown(spec, catalog) {
        Ok(breakdown) => breakdown.total,
        Err(e) => {
            tracing::debug!(%e, "VM spec left unpriced");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductLineItem;

    fn spec(vcpus: f64, memory_gb: f64, storage_gb: f64, clock_ghz: f64, tier: StorageTier) -> VmSpec {
        VmSpec::new(vcpus, memory_gb, storage_gb, clock_ghz, tier)
    }

    fn full_catalog() -> Catalog {
        Catalog::new(vec![
            ProductLineItem::new("cpu1", "CPU 1GHz per vCPU").with_cost(20.0, 60.0),
            ProductLineItem::new("cpu2", "CPU 2GHz per vCPU").with_cost(40.0, 50.0),
            ProductLineItem::new("mem", "Memory per GB").with_cost(3.0, 40.0),
            ProductLineItem::new("std", "Storage Standard SSD per GB").with_price(0.10),
            ProductLineItem::new("prem", "Storage Premium SSD per GB").with_price(0.25),
        ])
    }

    #[test]
    fn empty_catalog_uses_fallback_rates() {
        let s = spec(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd);
        let breakdown = price_breakdown(&s, &Catalog::default()).unwrap();
        assert_eq!(breakdown.cpu.amount, 310.0);
        assert_eq!(breakdown.memory.amount, 1000.0);
        assert!((breakdown.storage.amount - 90.0).abs() < 1e-9);
        assert!((breakdown.total - 1400.0).abs() < 1e-9);
        assert!(breakdown.cpu.is_fallback() && breakdown.memory.is_fallback() && breakdown.storage.is_fallback());
    }

    #[test]
    fn one_ghz_and_premium_fallbacks() {
        let s = spec(1.0, 4.0, 100.0, 1.0, StorageTier::PremiumSsd);
        let breakdown = price_breakdown(&s, &Catalog::default()).unwrap();
        // 30.98 / 0.4 = 77.45
        assert_eq!(breakdown.cpu.amount, 78.0);
        assert_eq!(breakdown.memory.amount, 500.0);
        assert!((breakdown.storage.amount - 275.0).abs() < 1e-9);
    }

    #[test]
    fn catalog_products_override_fallbacks() {
        let s = spec(3.0, 10.0, 40.0, 2.0, StorageTier::PremiumSsd);
        let breakdown = price_breakdown(&s, &full_catalog()).unwrap();
        // 40 / 0.5 = 80 per vCPU
        assert_eq!(breakdown.cpu.amount, 240.0);
        assert_eq!(breakdown.cpu.source, PriceSource::Catalog { product_id: "cpu2".into() });
        // 3 / 0.6 = 5 per GB
        assert_eq!(breakdown.memory.amount, 50.0);
        assert!((breakdown.storage.amount - 10.0).abs() < 1e-9);
        assert!(!breakdown.used_fallback());
    }

    #[test]
    fn storage_is_not_rounded() {
        let s = spec(1.0, 4.0, 13.0, 1.0, StorageTier::StandardSsd);
        let breakdown = price_breakdown(&s, &full_catalog()).unwrap();
        assert!((breakdown.storage.amount - 1.3).abs() < 1e-9);
        assert!(breakdown.total.fract() != 0.0);
    }

    #[test]
    fn incomplete_specs_price_to_zero() {
        let catalog = full_catalog();
        let base = spec(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd);
        for bad in [
            VmSpec { vcpus: 0.0, ..base },
            VmSpec { memory_gb: -1.0, ..base },
            VmSpec { storage_gb: f64::NAN, ..base },
            VmSpec { clock_ghz: 0.0, ..base },
        ] {
            assert_eq!(compute_price(&bad, &catalog), 0.0);
            assert_eq!(price_breakdown(&bad, &catalog), Err(QuoteError::IncompleteSpec));
        }
    }

    #[test]
    fn unknown_clock_tier_without_catalog_cover_is_unpriced() {
        let s = spec(2.0, 8.0, 50.0, 3.0, StorageTier::StandardSsd);
        assert_eq!(
            price_breakdown(&s, &Catalog::default()),
            Err(QuoteError::UnsupportedClockTier(3.0))
        );
        assert_eq!(compute_price(&s, &Catalog::default()), 0.0);

        let covered = Catalog::new(vec![ProductLineItem::new("cpu3", "CPU 3GHz").with_cost(10.0, 50.0)]);
        assert_eq!(price_breakdown(&s, &covered).unwrap().cpu.amount, 40.0);
    }

    #[test]
    fn unusable_margin_falls_back() {
        let catalog = Catalog::new(vec![ProductLineItem::new("cpu2", "CPU 2GHz").with_cost(10.0, 100.0)]);
        let s = spec(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd);
        assert!(price_breakdown(&s, &catalog).unwrap().cpu.is_fallback());
    }

    #[test]
    fn price_is_monotonic_in_each_quantity() {
        let catalog = full_catalog();
        let base = spec(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd);
        let mut last = compute_price(&base, &catalog);
        for vcpus in 3..=32 {
            let p = compute_price(&VmSpec { vcpus: vcpus as f64, ..base }, &catalog);
            assert!(p >= last);
            last = p;
        }
        let mut last = compute_price(&base, &catalog);
        for memory in [12.0, 16.0, 32.0, 64.0, 128.0] {
            let p = compute_price(&VmSpec { memory_gb: memory, ..base }, &catalog);
            assert!(p >= last);
            last = p;
        }
        let mut last = compute_price(&base, &catalog);
        for storage in (60..=2000).step_by(97) {
            let p = compute_price(&VmSpec { storage_gb: storage as f64, ..base }, &catalog);
            assert!(p >= last);
            last = p;
        }
    }
}
