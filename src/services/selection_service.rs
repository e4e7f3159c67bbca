use serde::Deserialize;

use crate::error::QuoteError;
use crate::models::{BuildMode, Catalog, QuoteSession, StorageTier, VmSpec, VmTemplate, WizardUpdate};
use crate::services::quote_service::select_addon;
use crate::services::wizard_service::{apply_update, submit};

/// One VM requested in a selection document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmRequest {
    pub server_name: String,
    pub region: String,
    pub os: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub build_mode: BuildMode,
    #[serde(default)]
    pub template_id: Option<String>,
    /// Custom specs; ignored in template mode.
    #[serde(default)]
    pub specs: VmSpec,
    /// Storage tier override. Template mode defaults to the template's tier,
    /// custom mode to the tier inside `specs`.
    #[serde(default)]
    pub tier: Option<StorageTier>,
}

/// A complete quote request: VMs to create and add-on product ids to select.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDocument {
    #[serde(default)]
    pub vms: Vec<VmRequest>,
    #[serde(default)]
    pub addons: Vec<String>,
}

/// Replay a selection document through the wizard and add-on selection,
/// producing a session ready to be quoted.
pub fn apply_selection(
    doc: &SelectionDocument,
    catalog: &Catalog,
    templates: &[VmTemplate],
    now_millis: i64,
) -> Result<QuoteSession, QuoteError> {
    let mut session = QuoteSession::new();
    for (offset, request) in doc.vms.iter().enumerate() {
        let tier = match request.build_mode {
            BuildMode::Template => request.tier,
            BuildMode::Custom => request.tier.or(Some(request.specs.tier)),
        };
        let update = WizardUpdate {
            region: Some(request.region.clone()),
            build_mode: Some(request.build_mode),
            template_id: request.template_id.clone(),
            custom_specs: Some(request.specs),
            tier,
            os: Some(request.os.clone()),
            server_name: Some(request.server_name.clone()),
            description: Some(request.description.clone()),
        };
        apply_update(&mut session.wizard, update, templates);
        submit(&mut session, catalog, templates, now_millis + offset as i64)?;
    }
    for product_id in &doc.addons {
        select_addon(&mut session, catalog, product_id)?;
    }
    Ok(session)
}
