pub mod config;
pub mod error;
pub mod inventory;
pub mod types;

pub use config::SizingConfig;
pub use error::{SizingError, SizingResult};
pub use inventory::{CandidateSystem, OverrideDocument, ReferenceCatalog, SystemKey, load_candidates};
pub use types::*;
