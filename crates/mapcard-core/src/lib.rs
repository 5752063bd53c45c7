//! Canonical domain model for business-listing extraction: validated
//! entities, normalization rules, derived metrics, and passive
//! configuration. Parsing lives in `mapcard-extract`; this crate only
//! turns parser drafts into schema-conformant records.

pub mod config;
pub mod enterprise;
pub mod error;
pub mod review;
pub mod service;
pub mod social;
pub mod text;
pub mod working_hours;

pub use config::{load_config, load_config_file, load_config_from_env, ExtractorConfig};
pub use enterprise::{Enterprise, EnterpriseDraft};
pub use error::{ConfigError, ModelError};
pub use review::{Review, ReviewDraft};
pub use service::{Service, ServiceDraft};
pub use social::{SocialDraft, SocialNetworks};
pub use working_hours::{WorkingHours, WorkingHoursDraft};
