//! Client settings and the job form.

pub mod form;
pub mod settings;

pub use form::JobForm;
pub use settings::{
    default_config_path, Settings, BASE_URL_ENV, DEFAULT_BASE_URL, POLL_INTERVAL_ENV,
};
