pub mod addon_selections;
pub mod app_state;
pub mod catalog;
pub mod customer;
pub mod price_breakdown;
pub mod product_line_item;
pub mod quote;
pub mod quote_session;
pub mod service_family;
pub mod session_store;
pub mod vm_configuration;
pub mod vm_spec;
pub mod vm_template;
pub mod wizard;

pub use addon_selections::AddonSelections;
pub use app_state::AppState;
pub use catalog::Catalog;
pub use customer::CustomerInfo;
pub use price_breakdown::{PriceBreakdown, PriceLeg, PriceSource};
pub use product_line_item::ProductLineItem;
pub use quote::{LineItemType, Quote, QuoteLineItem, VmDetails, DEFAULT_UNIT};
pub use quote_session::{QuoteSession, MAX_VMS};
pub use service_family::ServiceFamily;
pub use session_store::SessionStore;
pub use vm_configuration::{BuildMode, VmConfiguration};
pub use vm_spec::{
    ghz_token, StorageTier, VmSpec, CLOCK_TIERS_GHZ, CUSTOM_MEMORY_OPTIONS_GB, STORAGE_RANGE_GB, VCPU_RANGE,
};
pub use vm_template::{TemplateGroup, VmTemplate};
pub use wizard::{Transition, WizardDraft, WizardStep, WizardUpdate};
