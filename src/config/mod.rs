//! YAML-backed tax data provider.
//!
//! This module provides the [`ConfigLoader`] type: it loads federal,
//! state, reciprocity, and local tax data from YAML files and implements
//! all four collaborator interfaces the engine consumes.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AgreementConfig, FederalConfig, LocalsConfig, LocationConfig, ReciprocityConfig, StateConfig,
    StatesConfig,
};
