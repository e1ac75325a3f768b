//! Resolved location and tax jurisdiction models.
//!
//! A [`LocationInfo`] is what the external location service returns for an
//! address or location code: the governing state plus every taxing
//! jurisdiction tied to that location.

use serde::{Deserialize, Serialize};

/// The kind of taxing authority a jurisdiction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionType {
    /// A state-level jurisdiction.
    State,
    /// A county.
    County,
    /// A city.
    City,
    /// A municipality.
    Municipality,
    /// A school district.
    School,
    /// A township.
    Township,
}

/// A single taxing jurisdiction tied to a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxJurisdiction {
    /// Unique identifier for the jurisdiction (rate lookups key on this).
    pub jurisdiction_id: String,
    /// Human-readable jurisdiction name.
    pub jurisdiction_name: String,
    /// The kind of taxing authority.
    pub jurisdiction_type: JurisdictionType,
    /// The official jurisdiction code (e.g., a PSD or FIPS code).
    pub jurisdiction_code: String,
    /// Whether this jurisdiction taxes residents regardless of work location.
    #[serde(default)]
    pub residence_based: bool,
}

/// A resolved location: the governing state and its taxing jurisdictions.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::LocationInfo;
///
/// let location = LocationInfo {
///     state: "TX".to_string(),
///     tax_jurisdictions: vec![],
/// };
/// assert_eq!(location.state, "TX");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Two-letter state code governing this location.
    pub state: String,
    /// Every taxing jurisdiction tied to this location.
    #[serde(default)]
    pub tax_jurisdictions: Vec<TaxJurisdiction>,
}

impl LocationInfo {
    /// Returns the non-state (local) jurisdictions of this location.
    pub fn local_jurisdictions(&self) -> impl Iterator<Item = &TaxJurisdiction> {
        self.tax_jurisdictions
            .iter()
            .filter(|j| j.jurisdiction_type != JurisdictionType::State)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jurisdiction(id: &str, kind: JurisdictionType, residence_based: bool) -> TaxJurisdiction {
        TaxJurisdiction {
            jurisdiction_id: id.to_string(),
            jurisdiction_name: id.to_string(),
            jurisdiction_type: kind,
            jurisdiction_code: format!("{}-code", id),
            residence_based,
        }
    }

    #[test]
    fn test_local_jurisdictions_excludes_state() {
        let location = LocationInfo {
            state: "PA".to_string(),
            tax_jurisdictions: vec![
                jurisdiction("PA-STATE", JurisdictionType::State, false),
                jurisdiction("PA-PHL-CITY", JurisdictionType::City, true),
                jurisdiction("PA-PHL-SD", JurisdictionType::School, false),
            ],
        };

        let locals: Vec<&str> = location
            .local_jurisdictions()
            .map(|j| j.jurisdiction_id.as_str())
            .collect();
        assert_eq!(locals, vec!["PA-PHL-CITY", "PA-PHL-SD"]);
    }

    #[test]
    fn test_jurisdiction_type_serialization() {
        assert_eq!(
            serde_json::to_string(&JurisdictionType::School).unwrap(),
            "\"school\""
        );
        assert_eq!(
            serde_json::to_string(&JurisdictionType::Municipality).unwrap(),
            "\"municipality\""
        );
    }

    #[test]
    fn test_deserialize_location_info() {
        let json = r#"{
            "state": "OH",
            "tax_jurisdictions": [
                {
                    "jurisdiction_id": "OH-CLE-CITY",
                    "jurisdiction_name": "Cleveland",
                    "jurisdiction_type": "city",
                    "jurisdiction_code": "18000",
                    "residence_based": true
                }
            ]
        }"#;

        let location: LocationInfo = serde_json::from_str(json).unwrap();
        assert_eq!(location.state, "OH");
        assert_eq!(location.tax_jurisdictions.len(), 1);
        assert!(location.tax_jurisdictions[0].residence_based);
        assert_eq!(
            location.tax_jurisdictions[0].jurisdiction_type,
            JurisdictionType::City
        );
    }

    #[test]
    fn test_deserialize_location_without_jurisdictions() {
        let json = r#"{ "state": "TX" }"#;
        let location: LocationInfo = serde_json::from_str(json).unwrap();
        assert!(location.tax_jurisdictions.is_empty());
    }
}
