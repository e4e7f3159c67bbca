use std::collections::HashSet;

use crate::error::QuoteError;
use crate::models::{
    AddonSelections, Catalog, LineItemType, ProductLineItem, Quote, QuoteLineItem, QuoteSession,
    ServiceFamily, VmConfiguration, VmDetails, DEFAULT_UNIT, MAX_VMS,
};

fn vm_line_item(vm: &VmConfiguration) -> QuoteLineItem {
    let description = if vm.description.trim().is_empty() {
        format!("{} · {} · {}", vm.region, vm.os, vm.summary())
    } else {
        vm.description.clone()
    };
    QuoteLineItem {
        id: vm.id.clone(),
        title: vm.server_name.clone(),
        description,
        price: vm.monthly_price,
        units: 1,
        unit: DEFAULT_UNIT.to_string(),
        kind: Some(LineItemType::VirtualMachine),
        details: Some(VmDetails {
            configuration: vm.clone(),
        }),
        family: Some(ServiceFamily::VirtualMachine),
    }
}

fn addon_line_item(family: ServiceFamily, product: &ProductLineItem) -> QuoteLineItem {
    QuoteLineItem {
        id: product.id.clone(),
        title: product.title.clone(),
        description: product
            .sub_category_name
            .clone()
            .or_else(|| product.category_name.clone())
            .unwrap_or_default(),
        price: product.price,
        units: 1,
        unit: DEFAULT_UNIT.to_string(),
        kind: None,
        details: None,
        family: Some(family),
    }
}

/// Line items contributed by one family, in selection order.
fn assemble_family(
    family: ServiceFamily,
    vms: &[VmConfiguration],
    addons: &AddonSelections,
) -> Vec<QuoteLineItem> {
    match family {
        ServiceFamily::VirtualMachine => vms.iter().map(vm_line_item).collect(),
        addon => addons
            .for_family(addon)
            .map(|items| items.iter().map(|p| addon_line_item(addon, p)).collect())
            .unwrap_or_default(),
    }
}

/// Flatten VMs and add-on selections into one quote.
///
/// Items are grouped per family: VMs first, then each add-on family in
/// [`ServiceFamily::ADDONS`] order. Inside a family, items keep the order
/// they were selected in and are never sorted. Selecting a firewall before a
/// backup still lists the backup first. An id seen twice keeps its first
/// occurrence. The result depends only on the inputs.
pub fn build_quote(vms: &[VmConfiguration], addons: &AddonSelections) -> Quote {
    let families = std::iter::once(ServiceFamily::VirtualMachine).chain(ServiceFamily::ADDONS);
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for family in families {
        for item in assemble_family(family, vms, addons) {
            if seen.insert(item.id.clone()) {
                items.push(item);
            } else {
                tracing::debug!(id = %item.id, %family, "Dropping duplicate quote line item");
            }
        }
    }
    let total_cost = items.iter().map(QuoteLineItem::line_total).sum();
    tracing::debug!(items = items.len(), total_cost, "Built quote");
    Quote { items, total_cost }
}

pub fn session_quote(session: &QuoteSession) -> Quote {
    build_quote(&session.vms, &session.addons)
}

/// Remove the line item `id` from whichever selection holds it and return
/// the rebuilt quote. Unknown ids leave the session untouched.
pub fn remove_line_item(session: &mut QuoteSession, id: &str) -> Quote {
    let current = session_quote(session);
    let Some(item) = current.get(id) else {
        return current;
    };
    if item.is_vm() {
        session.vms.retain(|vm| vm.id != id);
    } else {
        for family in ServiceFamily::ADDONS {
            if let Some(list) = session.addons.for_family_mut(family) {
                list.retain(|p| p.id != id);
            }
        }
    }
    session_quote(session)
}

/// Drop every VM and add-on selection.
pub fn clear_quote(session: &mut QuoteSession) -> Quote {
    session.vms.clear();
    session.addons.clear();
    Quote::empty()
}

/// Put a catalog product into its add-on family's selection. Selecting the
/// same product twice keeps a single entry.
pub fn select_addon(session: &mut QuoteSession, catalog: &Catalog, product_id: &str) -> Result<Quote, QuoteError> {
    let product = catalog
        .get(product_id)
        .ok_or_else(|| QuoteError::ProductNotFound(product_id.to_string()))?;
    let family = product
        .family
        .filter(ServiceFamily::is_addon)
        .ok_or_else(|| QuoteError::NotAnAddon(product_id.to_string()))?;
    let list = session
        .addons
        .for_family_mut(family)
        .ok_or_else(|| QuoteError::NotAnAddon(product_id.to_string()))?;
    if !list.iter().any(|p| p.id == product.id) {
        list.push(product.clone());
    }
    Ok(session_quote(session))
}

/// Add a priced VM to the working set, refusing once [`MAX_VMS`] exist.
pub fn add_vm(session: &mut QuoteSession, vm: VmConfiguration) -> Result<(), QuoteError> {
    if !session.can_create_vm() {
        tracing::warn!(limit = MAX_VMS, "Rejected VM creation: limit reached");
        return Err(QuoteError::VmLimitReached { limit: MAX_VMS });
    }
    tracing::info!(id = %vm.id, price = vm.monthly_price, "Added VM configuration");
    session.vms.push(vm);
    Ok(())
}

/// Delete one VM by id. Returns whether anything was removed.
pub fn delete_vm(session: &mut QuoteSession, id: &str) -> bool {
    let before = session.vms.len();
    session.vms.retain(|vm| vm.id != id);
    session.vms.len() != before
}

/// Timestamp-derived VM id, bumped until it is unique within the session.
pub fn next_vm_id(session: &QuoteSession, now_millis: i64) -> String {
    let mut stamp = now_millis;
    loop {
        let id = format!("vm-{}", stamp);
        if session.vm(&id).is_none() {
            return id;
        }
        stamp += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildMode, StorageTier, VmSpec};

    fn vm(id: &str, price: f64) -> VmConfiguration {
        VmConfiguration {
            id: id.to_string(),
            region: "us-east".into(),
            os: "Ubuntu 22.04".into(),
            tier: StorageTier::StandardSsd,
            server_name: format!("srv-{}", id),
            description: String::new(),
            build_mode: BuildMode::Custom,
            specs: VmSpec::new(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd),
            template_id: None,
            monthly_price: price,
        }
    }

    #[test]
    fn vm_items_carry_nested_specs() {
        let quote = build_quote(&[vm("vm-1", 1400.0)], &AddonSelections::default());
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["items"][0]["type"], "virtualMachine");
        assert_eq!(json["items"][0]["details"]["configuration"]["specs"]["vcpus"], 2.0);
        assert_eq!(json["items"][0]["unit"], "month");
        assert_eq!(json["totalCost"], 1400.0);
    }

    #[test]
    fn addon_items_are_flat() {
        let mut addons = AddonSelections::default();
        addons.licensing.push(ProductLineItem::new("m365", "M365 Business").with_price(22.0));
        let quote = build_quote(&[], &addons);
        let json = serde_json::to_value(&quote.items[0]).unwrap();
        assert!(json.get("type").is_none());
        assert!(json.get("details").is_none());
        assert!(json.get("family").is_none());
        assert_eq!(json["units"], 1);
    }

    #[test]
    fn next_vm_id_skips_taken_stamps() {
        let mut session = QuoteSession::new();
        session.vms.push(vm("vm-100", 1.0));
        session.vms.push(vm("vm-101", 1.0));
        assert_eq!(next_vm_id(&session, 100), "vm-102");
        assert_eq!(next_vm_id(&session, 50), "vm-50");
    }
}
