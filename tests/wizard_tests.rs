use vmquote::error::QuoteError;
use vmquote::models::{
    BuildMode, Catalog, QuoteSession, StorageTier, TemplateGroup, Transition, VmSpec, VmTemplate, WizardStep,
    WizardUpdate,
};
use vmquote::services::{advance, apply_selection, apply_update, go_back, go_to_step, submit, SelectionDocument};

fn templates() -> Vec<VmTemplate> {
    vec![VmTemplate {
        id: "tpl-small".to_string(),
        group: TemplateGroup::Small,
        os_type: "linux".to_string(),
        tier: StorageTier::PremiumSsd,
        vcpus: 2.0,
        memory: 8.0,
        storage: 50.0,
        ghz: 2.0,
        description: "Small general purpose".to_string(),
    }]
}

fn complete_update() -> WizardUpdate {
    WizardUpdate {
        region: Some("eu-west".to_string()),
        build_mode: Some(BuildMode::Custom),
        custom_specs: Some(VmSpec::new(2.0, 8.0, 50.0, 2.0, StorageTier::StandardSsd)),
        tier: Some(StorageTier::StandardSsd),
        os: Some("Ubuntu 22.04".to_string()),
        server_name: Some("web-01".to_string()),
        ..WizardUpdate::default()
    }
}

#[test]
fn test_cannot_skip_ahead_without_region() {
    let mut session = QuoteSession::new();
    let outcome = go_to_step(&mut session.wizard, WizardStep::Tier, &templates());
    assert_eq!(
        outcome,
        Transition::Rejected {
            step: WizardStep::Region,
            blocked_by: WizardStep::Region
        }
    );
    assert_eq!(session.wizard.step, WizardStep::Region);
}

#[test]
fn test_region_unlocks_build_step() {
    let mut session = QuoteSession::new();
    let update = WizardUpdate {
        region: Some("us-east".to_string()),
        ..WizardUpdate::default()
    };
    apply_update(&mut session.wizard, update, &templates());
    assert!(advance(&mut session.wizard, &templates()).is_moved());
    assert_eq!(session.wizard.step, WizardStep::Build);

    // Build is still empty, so the tier step stays locked.
    assert!(!advance(&mut session.wizard, &templates()).is_moved());
    assert_eq!(session.wizard.step, WizardStep::Build);

    assert_eq!(go_back(&mut session.wizard), Transition::Moved { step: WizardStep::Region });
}

#[test]
fn test_choosing_template_prefills_its_tier() {
    let mut session = QuoteSession::new();
    let update = WizardUpdate {
        template_id: Some("tpl-small".to_string()),
        ..WizardUpdate::default()
    };
    apply_update(&mut session.wizard, update, &templates());
    assert_eq!(session.wizard.tier, Some(StorageTier::PremiumSsd));
}

#[test]
fn test_submit_prices_and_resets_the_draft() {
    let mut session = QuoteSession::new();
    apply_update(&mut session.wizard, complete_update(), &templates());
    let vm = submit(&mut session, &Catalog::default(), &templates(), 1_700_000_000_000).unwrap();
    assert_eq!(vm.id, "vm-1700000000000");
    assert!((vm.monthly_price - 1400.0).abs() < 1e-9);
    assert_eq!(session.vms.len(), 1);
    assert_eq!(session.wizard.step, WizardStep::Region);
    assert_eq!(session.wizard.region, None);
}

#[test]
fn test_submit_with_missing_os_names_the_step() {
    let mut session = QuoteSession::new();
    let update = WizardUpdate {
        os: None,
        ..complete_update()
    };
    apply_update(&mut session.wizard, update, &templates());
    assert_eq!(
        submit(&mut session, &Catalog::default(), &templates(), 1),
        Err(QuoteError::WizardIncomplete(WizardStep::Os))
    );
    assert!(session.vms.is_empty());
}

#[test]
fn test_sixth_vm_is_rejected_and_count_stays_at_five() {
    let mut session = QuoteSession::new();
    for n in 0..5 {
        apply_update(&mut session.wizard, complete_update(), &templates());
        submit(&mut session, &Catalog::default(), &templates(), 1_000 + n).unwrap();
    }
    apply_update(&mut session.wizard, complete_update(), &templates());
    assert_eq!(
        submit(&mut session, &Catalog::default(), &templates(), 2_000),
        Err(QuoteError::VmLimitReached { limit: 5 })
    );
    assert_eq!(session.vms.len(), 5);
}

#[test]
fn test_vm_ids_stay_unique_for_same_timestamp() {
    let mut session = QuoteSession::new();
    for _ in 0..2 {
        apply_update(&mut session.wizard, complete_update(), &templates());
        submit(&mut session, &Catalog::default(), &templates(), 42).unwrap();
    }
    assert_eq!(session.vms[0].id, "vm-42");
    assert_eq!(session.vms[1].id, "vm-43");
}

#[test]
fn test_selection_document_builds_a_session() {
    let raw = r#"{
        "vms": [
            {"serverName": "db-01", "region": "eu-west", "os": "Debian 12",
             "buildMode": "template", "templateId": "tpl-small"},
            {"serverName": "app-01", "region": "eu-west", "os": "Ubuntu 22.04",
             "buildMode": "custom",
             "specs": {"vcpus": "2", "memoryGB": 8, "storageGB": 50, "clockGHz": 2, "tier": "Standard SSD"}}
        ],
        "addons": []
    }"#;
    let doc: SelectionDocument = serde_json::from_str(raw).unwrap();
    let session = apply_selection(&doc, &Catalog::default(), &templates(), 10).unwrap();
    assert_eq!(session.vms.len(), 2);
    assert_eq!(session.vms[0].tier, StorageTier::PremiumSsd);
    assert_eq!(session.vms[1].monthly_price, 1400.0);
}

#[test]
fn test_custom_specs_outside_the_option_sets_are_rejected() {
    let mut session = QuoteSession::new();
    let update = WizardUpdate {
        custom_specs: Some(VmSpec::new(2.5, 7.0, 3.0, 2.0, StorageTier::StandardSsd)),
        ..complete_update()
    };
    apply_update(&mut session.wizard, update, &templates());
    assert_eq!(
        submit(&mut session, &Catalog::default(), &templates(), 1),
        Err(QuoteError::WizardIncomplete(WizardStep::Build))
    );
    assert!(session.vms.is_empty());

    let outcome = go_to_step(&mut session.wizard, WizardStep::Tier, &templates());
    assert_eq!(
        outcome,
        Transition::Rejected {
            step: WizardStep::Region,
            blocked_by: WizardStep::Build
        }
    );
}
