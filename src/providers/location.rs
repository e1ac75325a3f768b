//! Location resolution interface.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{Address, LocationInfo};

/// Resolves addresses and location codes to taxing jurisdictions.
///
/// Implementations are expected to fail with
/// [`crate::error::EngineError::LocationNotFound`] for unresolvable input.
#[async_trait]
pub trait LocationService: Send + Sync {
    /// Resolves a full postal address to its taxing jurisdictions.
    async fn validate_location(&self, address: &Address) -> EngineResult<LocationInfo>;

    /// Resolves a pre-assigned location code to its taxing jurisdictions.
    async fn location_by_code(&self, code: &str) -> EngineResult<LocationInfo>;
}
