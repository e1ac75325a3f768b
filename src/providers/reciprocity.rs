//! Cross-state reciprocity interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// A reciprocity rule for an ordered (home state, work state) pair.
///
/// Under a reciprocity agreement, a non-resident working in the work state
/// has income tax withheld for the home state instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciprocityRule {
    /// Whether an agreement exists for the pair.
    pub has_agreement: bool,
    /// Free-form details about the agreement, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ReciprocityRule {
    /// A rule representing the absence of any agreement.
    pub fn none() -> Self {
        Self {
            has_agreement: false,
            details: None,
        }
    }
}

/// Looks up reciprocity agreements between state pairs.
#[async_trait]
pub trait ReciprocityService: Send + Sync {
    /// Returns the reciprocity rule for the ordered (home, work) pair.
    ///
    /// Absence of an agreement is a successful lookup returning
    /// `has_agreement: false`, not an error.
    async fn reciprocity_rule(
        &self,
        home_state: &str,
        work_state: &str,
    ) -> EngineResult<ReciprocityRule>;
}
