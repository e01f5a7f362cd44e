pub mod config;
pub mod error;
pub mod types;

pub use config::CrmConfig;
pub use error::{CrmError, CrmResult};
