use vmquote::error::QuoteError;
use vmquote::models::{Catalog, PriceSource, ProductLineItem, StorageTier, VmSpec};
use vmquote::services::{compute_price, price_breakdown};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn full_catalog() -> Catalog {
    Catalog::new(vec![
        ProductLineItem::new("cpu-1", "vCPU 1GHz").with_cost(20.0, 50.0),
        ProductLineItem::new("cpu-2", "vCPU 2GHz").with_cost(40.0, 50.0),
        ProductLineItem::new("mem", "Memory (per GB)").with_cost(10.0, 50.0),
        ProductLineItem::new("std", "Storage - Standard SSD (per GB)").with_price(1.5),
        ProductLineItem::new("prem", "Storage - Premium SSD (per GB)").with_price(2.5),
    ])
}

#[test]
fn test_fallback_only_price_matches_reference() {
    // cpu ceil(2*61.97/0.4)=310, memory ceil(8*50/0.4)=1000, storage 50*1.80=90
    let spec = VmSpec::new(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd);
    assert!(approx(compute_price(&spec, &Catalog::default()), 1400.0));
}

#[test]
fn test_catalog_products_take_precedence() {
    let spec = VmSpec::new(2.0, 8.0, 50.0, 2.0, StorageTier::PremiumSsd);
    let breakdown = price_breakdown(&spec, &full_catalog()).unwrap();
    // ceil(40/0.5*2)=160, ceil(10/0.5*8)=160, 2.5*50=125
    assert!(approx(breakdown.cpu.amount, 160.0));
    assert!(approx(breakdown.memory.amount, 160.0));
    assert!(approx(breakdown.storage.amount, 125.0));
    assert!(approx(breakdown.total, 445.0));
    assert!(!breakdown.used_fallback());
    assert_eq!(
        breakdown.storage.source,
        PriceSource::Catalog {
            product_id: "prem".to_string()
        }
    );
}

#[test]
fn test_clock_tier_selects_matching_cpu_product() {
    let one = VmSpec::new(4.0, 4.0, 10.0, 1.0, StorageTier::StandardSsd);
    let two = VmSpec { clock_ghz: 2.0, ..one };
    let catalog = full_catalog();
    let cpu_one = price_breakdown(&one, &catalog).unwrap().cpu;
    let cpu_two = price_breakdown(&two, &catalog).unwrap().cpu;
    assert!(approx(cpu_one.amount, 160.0));
    assert!(approx(cpu_two.amount, 320.0));
}

#[test]
fn test_price_is_monotonic_in_each_dimension() {
    let catalog = full_catalog();
    let base = VmSpec::new(2.0, 4.0, 40.0, 2.0, StorageTier::StandardSsd);
    let p = compute_price(&base, &catalog);
    assert!(compute_price(&VmSpec { vcpus: 3.0, ..base }, &catalog) >= p);
    assert!(compute_price(&VmSpec { memory_gb: 6.0, ..base }, &catalog) >= p);
    assert!(compute_price(&VmSpec { storage_gb: 80.0, ..base }, &catalog) >= p);
}

#[test]
fn test_incomplete_spec_prices_at_zero() {
    let spec = VmSpec {
        vcpus: f64::NAN,
        ..VmSpec::new(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd)
    };
    assert_eq!(compute_price(&spec, &full_catalog()), 0.0);
    assert_eq!(price_breakdown(&spec, &full_catalog()), Err(QuoteError::IncompleteSpec));
}

#[test]
fn test_unsupported_clock_without_catalog_product_is_an_error() {
    let spec = VmSpec::new(2.0, 8.0, 50.0, 3.0, StorageTier::StandardSsd);
    assert_eq!(
        price_breakdown(&spec, &Catalog::default()),
        Err(QuoteError::UnsupportedClockTier(3.0))
    );
    assert_eq!(compute_price(&spec, &Catalog::default()), 0.0);
}

#[test]
fn test_product_with_invalid_profit_falls_back() {
    let catalog = Catalog::new(vec![ProductLineItem::new("mem", "Memory").with_cost(10.0, 100.0)]);
    let spec = VmSpec::new(1.0, 2.0, 10.0, 1.0, StorageTier::StandardSsd);
    let breakdown = price_breakdown(&spec, &catalog).unwrap();
    assert!(breakdown.memory.is_fallback());
    assert!(approx(breakdown.memory.amount, 250.0));
}

#[test]
fn test_negative_storage_price_falls_back() {
    let catalog = Catalog::new(vec![ProductLineItem::new("std", "Storage Standard SSD").with_price(-5.0)]);
    let spec = VmSpec::new(1.0, 4.0, 1000.0, 1.0, StorageTier::StandardSsd);
    let breakdown = price_breakdown(&spec, &catalog).unwrap();
    assert!(breakdown.storage.is_fallback());
    assert!(approx(breakdown.storage.amount, 1800.0));
    assert!(compute_price(&spec, &catalog) > 0.0);
}

#[test]
fn test_non_finite_price_string_decodes_as_zero() {
    let raw = r#"[{"id": "std", "title": "Storage Standard SSD", "price": "NaN"},
                  {"id": "mem", "title": "Memory", "cost": "inf", "profit": 50}]"#;
    let catalog: Catalog = serde_json::from_str(raw).unwrap();
    assert_eq!(catalog.get("std").map(|p| p.price), Some(0.0));
    assert_eq!(catalog.get("mem").map(|p| p.cost), Some(0.0));

    let spec = VmSpec::new(1.0, 4.0, 100.0, 1.0, StorageTier::StandardSsd);
    let price = compute_price(&spec, &catalog);
    assert!(price.is_finite());
    assert!(price >= 0.0);
}
