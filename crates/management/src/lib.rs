//! Clarity trial campaign console: campaign configuration, the in-memory
//! campaign registry, and the REST API the console UI talks to.
//!
//! Data lives in a DashMap for the lifetime of the process; nothing is
//! persisted.

pub mod filter;
pub mod form;
pub mod handlers;
pub mod id_set;
pub mod models;
pub mod router;
pub mod store;
pub mod validation;
pub mod workflows;

pub use filter::{CampaignQuery, StatusFilter};
pub use form::CampaignForm;
pub use handlers::ManagementState;
pub use id_set::IdentifierSet;
pub use router::management_router;
pub use store::CampaignRegistry;
pub use validation::CampaignValidator;
