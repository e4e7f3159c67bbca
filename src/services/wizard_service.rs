use crate::error::QuoteError;
use crate::models::{
    BuildMode, Catalog, QuoteSession, StorageTier, Transition, VmConfiguration, VmSpec, VmTemplate,
    WizardDraft, WizardStep, WizardUpdate,
};
use crate::services::pricing_service::price_breakdown;
use crate::services::quote_service::{add_vm, next_vm_id};

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn find_template<'a>(templates: &'a [VmTemplate], id: &str) -> Option<&'a VmTemplate> {
    templates.iter().find(|t| t.id == id)
}

/// Whether `step`'s input is filled in well enough to move past it.
pub fn step_complete(draft: &WizardDraft, step: WizardStep, templates: &[VmTemplate]) -> bool {
    match step {
        WizardStep::Region => non_blank(&draft.region),
        WizardStep::Build => match draft.build_mode {
            BuildMode::Template => draft
                .template_id
                .as_deref()
                .map(|id| find_template(templates, id).is_some())
                .unwrap_or(false),
            BuildMode::Custom => draft.custom_specs.is_custom_option(),
        },
        WizardStep::Tier => draft.tier.is_some(),
        WizardStep::Os => non_blank(&draft.os),
        WizardStep::Name => !draft.server_name.trim().is_empty(),
    }
}

/// First step that still blocks submission, if any.
pub fn first_incomplete_step(draft: &WizardDraft, templates: &[VmTemplate]) -> Option<WizardStep> {
    WizardStep::ALL
        .into_iter()
        .find(|step| !step_complete(draft, *step, templates))
}

/// Move the wizard to `target`.
///
/// Earlier steps and the current one are always reachable. Moving forward
/// requires every step in between to be complete; otherwise the draft stays
/// where it is.
pub fn go_to_step(draft: &mut WizardDraft, target: WizardStep, templates: &[VmTemplate]) -> Transition {
    if target <= draft.step {
        draft.step = target;
        return Transition::Moved { step: target };
    }
    let blocker = WizardStep::ALL[draft.step.index()..target.index()]
        .iter()
        .copied()
        .find(|step| !step_complete(draft, *step, templates));
    match blocker {
        Some(blocked_by) => {
            tracing::debug!(from = %draft.step, to = %target, %blocked_by, "Wizard transition rejected");
            Transition::Rejected {
                step: draft.step,
                blocked_by,
            }
        }
        None => {
            draft.step = target;
            Transition::Moved { step: target }
        }
    }
}

/// Step forward by one. On the last step this is a no-op move.
pub fn advance(draft: &mut WizardDraft, templates: &[VmTemplate]) -> Transition {
    let target = draft.step.next().unwrap_or(draft.step);
    go_to_step(draft, target, templates)
}

pub fn go_back(draft: &mut WizardDraft) -> Transition {
    let target = draft
        .step
        .index()
        .checked_sub(1)
        .and_then(WizardStep::from_index)
        .unwrap_or(WizardStep::Region);
    draft.step = target;
    Transition::Moved { step: target }
}

/// Apply field edits to the draft. Choosing a template pre-selects its
/// storage tier unless one was already picked.
pub fn apply_update(draft: &mut WizardDraft, update: WizardUpdate, templates: &[VmTemplate]) {
    if let Some(region) = update.region {
        draft.region = Some(region.trim().to_string());
    }
    if let Some(mode) = update.build_mode {
        draft.build_mode = mode;
    }
    if let Some(template_id) = update.template_id {
        let template_id = template_id.trim().to_string();
        if draft.tier.is_none() {
            draft.tier = find_template(templates, &template_id).map(|t| t.tier);
        }
        draft.template_id = Some(template_id);
    }
    if let Some(specs) = update.custom_specs {
        draft.custom_specs = specs;
    }
    if let Some(tier) = update.tier {
        draft.tier = Some(tier);
    }
    if let Some(os) = update.os {
        draft.os = Some(os.trim().to_string());
    }
    if let Some(name) = update.server_name {
        draft.server_name = name;
    }
    if let Some(description) = update.description {
        draft.description = description;
    }
}

/// Specs the draft resolves to, with the wizard's tier applied.
pub fn resolve_spec(draft: &WizardDraft, templates: &[VmTemplate]) -> Result<VmSpec, QuoteError> {
    let tier = draft.tier.unwrap_or(StorageTier::default());
    match draft.build_mode {
        BuildMode::Template => {
            let id = draft.template_id.as_deref().unwrap_or_default();
            let template =
                find_template(templates, id).ok_or_else(|| QuoteError::TemplateNotFound(id.to_string()))?;
            Ok(template.to_spec(tier))
        }
        BuildMode::Custom => Ok(VmSpec {
            tier,
            ..draft.custom_specs
        }),
    }
}

/// Create a VM from the completed draft, price it against `catalog` and add
/// it to the session. The draft is reset to the region step on success.
pub fn submit(
    session: &mut QuoteSession,
    catalog: &Catalog,
    templates: &[VmTemplate],
    now_millis: i64,
) -> Result<VmConfiguration, QuoteError> {
    if !session.can_create_vm() {
        return Err(QuoteError::VmLimitReached {
            limit: crate::models::MAX_VMS,
        });
    }
    if let Some(step) = first_incomplete_step(&session.wizard, templates) {
        return Err(QuoteError::WizardIncomplete(step));
    }
    let draft = &session.wizard;
    let specs = resolve_spec(draft, templates)?;
    let breakdown = price_breakdown(&specs, catalog)?;
    if breakdown.used_fallback() {
        tracing::warn!(
            cpu = breakdown.cpu.is_fallback(),
            memory = breakdown.memory.is_fallback(),
            storage = breakdown.storage.is_fallback(),
            "VM priced with fallback rates"
        );
    }
    let vm = VmConfiguration {
        id: next_vm_id(session, now_millis),
        region: draft.region.clone().unwrap_or_default(),
        os: draft.os.clone().unwrap_or_default(),
        tier: specs.tier,
        server_name: draft.server_name.trim().to_string(),
        description: draft.description.trim().to_string(),
        build_mode: draft.build_mode,
        specs,
        template_id: match draft.build_mode {
            BuildMode::Template => draft.template_id.clone(),
            BuildMode::Custom => None,
        },
        monthly_price: breakdown.total,
    };
    add_vm(session, vm.clone())?;
    session.wizard = WizardDraft::default();
    Ok(vm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TemplateGroup;

    fn templates() -> Vec<VmTemplate> {
        vec![VmTemplate {
            id: "t-small".into(),
            group: TemplateGroup::Small,
            os_type: "linux".into(),
            tier: StorageTier::PremiumSsd,
            vcpus: 2.0,
            memory: 4.0,
            storage: 40.0,
            ghz: 1.0,
            description: "Small".into(),
        }]
    }

    #[test]
    fn step_back_is_always_allowed() {
        let mut draft = WizardDraft {
            step: WizardStep::Os,
            ..WizardDraft::default()
        };
        assert_eq!(go_to_step(&mut draft, WizardStep::Region, &[]), Transition::Moved { step: WizardStep::Region });
        assert_eq!(go_back(&mut draft), Transition::Moved { step: WizardStep::Region });
    }

    #[test]
    fn choosing_template_prefills_tier() {
        let mut draft = WizardDraft::default();
        apply_update(
            &mut draft,
            WizardUpdate {
                template_id: Some("t-small".into()),
                ..WizardUpdate::default()
            },
            &templates(),
        );
        assert_eq!(draft.tier, Some(StorageTier::PremiumSsd));
        assert!(step_complete(&draft, WizardStep::Build, &templates()));
        assert!(!step_complete(&draft, WizardStep::Build, &[]));
    }

    #[test]
    fn custom_specs_need_every_quantity() {
        let mut draft = WizardDraft {
            build_mode: BuildMode::Custom,
            ..WizardDraft::default()
        };
        draft.custom_specs.vcpus = 4.0;
        draft.custom_specs.memory_gb = 8.0;
        draft.custom_specs.storage_gb = 100.0;
        assert!(!step_complete(&draft, WizardStep::Build, &[]));
        draft.custom_specs.clock_ghz = 2.0;
        assert!(step_complete(&draft, WizardStep::Build, &[]));
    }

    #[test]
    fn blank_name_blocks_submission() {
        let draft = WizardDraft {
            server_name: "   ".into(),
            ..WizardDraft::default()
        };
        assert!(!step_complete(&draft, WizardStep::Name, &[]));
        assert_eq!(first_incomplete_step(&draft, &[]), Some(WizardStep::Region));
    }
}
