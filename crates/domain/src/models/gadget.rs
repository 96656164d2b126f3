//! Gadget domain model.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Lifecycle status of a gadget.
///
/// Wire and database values are the variant names (`Available`, `Deployed`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GadgetStatus {
    Available,
    Deployed,
    Decommissioned,
    Destroyed,
}

impl GadgetStatus {
    /// Every declared status. Filter validation and parsing both go through this list.
    pub const ALL: [GadgetStatus; 4] = [
        GadgetStatus::Available,
        GadgetStatus::Deployed,
        GadgetStatus::Decommissioned,
        GadgetStatus::Destroyed,
    ];

    /// Converts to wire/database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GadgetStatus::Available => "Available",
            GadgetStatus::Deployed => "Deployed",
            GadgetStatus::Decommissioned => "Decommissioned",
            GadgetStatus::Destroyed => "Destroyed",
        }
    }

    /// Parses from wire/database string representation (exact match).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Comma separated list of valid values, for error messages.
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for GadgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a gadget in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gadget {
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatus,
    pub created_at: DateTime<Utc>,
    pub decommissioned_at: Option<DateTime<Utc>>,
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Gadget {
    /// Builds a freshly created gadget with the default status.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: GadgetStatus::Available,
            created_at: Utc::now(),
            decommissioned_at: None,
            destroyed_at: None,
        }
    }

    /// Listing label with a freshly rolled success probability.
    pub fn label_with_chance(&self) -> String {
        let chance: u8 = rand::thread_rng().gen_range(0..100);
        success_chance_label(&self.name, chance)
    }
}

/// Formats `The {Name} - {chance}% success probability`, capitalizing the name.
pub fn success_chance_label(name: &str, chance: u8) -> String {
    format!(
        "The {} - {}% success probability",
        shared::naming::capitalize_first(name),
        chance
    )
}

/// Partial update applied by a gadget store.
///
/// `None` fields are left untouched. Lifecycle timestamps are only written
/// when the stored value is still null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GadgetChanges {
    pub name: Option<String>,
    pub status: Option<GadgetStatus>,
    pub decommissioned_at: Option<DateTime<Utc>>,
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl GadgetChanges {
    /// Name and/or status change, stamping the lifecycle timestamp that matches the new status.
    pub fn edit(name: Option<String>, status: Option<GadgetStatus>, now: DateTime<Utc>) -> Self {
        Self {
            name,
            status,
            decommissioned_at: (status == Some(GadgetStatus::Decommissioned)).then_some(now),
            destroyed_at: (status == Some(GadgetStatus::Destroyed)).then_some(now),
        }
    }

    pub fn decommission(now: DateTime<Utc>) -> Self {
        Self::edit(None, Some(GadgetStatus::Decommissioned), now)
    }

    pub fn destroy(now: DateTime<Utc>) -> Self {
        Self::edit(None, Some(GadgetStatus::Destroyed), now)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.decommissioned_at.is_none()
            && self.destroyed_at.is_none()
    }
}

/// Parses a client supplied gadget id.
pub fn parse_gadget_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Validates that a status filter names a declared status.
fn validate_status_filter(status: &str) -> Result<(), ValidationError> {
    if GadgetStatus::parse(status).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("gadget_status");
        err.message = Some(
            format!(
                "Invalid status. Must be one of: {}",
                GadgetStatus::allowed_values()
            )
            .into(),
        );
        Err(err)
    }
}

/// Query parameters for listing gadgets.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListGadgetsQuery {
    #[validate(custom(function = "validate_status_filter"))]
    pub status: Option<String>,
}

impl ListGadgetsQuery {
    /// Parsed status filter. Call after `validate()`; unknown values map to `None`.
    pub fn status_filter(&self) -> Option<GadgetStatus> {
        self.status.as_deref().and_then(GadgetStatus::parse)
    }
}

/// Request payload for updating a gadget (partial update).
///
/// `status` is kept as a raw string; membership in the status set is enforced by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGadgetRequest {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
}

/// Request payload for decommissioning a gadget.
#[derive(Debug, Clone, Deserialize)]
pub struct DecommissionGadgetRequest {
    pub id: String,
}

/// Response for listing gadgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGadgetsResponse {
    pub names_with_chances: Vec<String>,
}

/// Response after creating a gadget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGadgetResponse {
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Gadget> for CreateGadgetResponse {
    fn from(g: Gadget) -> Self {
        Self {
            id: g.id,
            name: g.name,
            status: g.status,
            created_at: g.created_at,
        }
    }
}

/// Response after updating a gadget.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateGadgetResponse {
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatus,
}

impl From<Gadget> for UpdateGadgetResponse {
    fn from(g: Gadget) -> Self {
        Self {
            id: g.id,
            name: g.name,
            status: g.status,
        }
    }
}

/// Response after decommissioning a gadget.
#[derive(Debug, Clone, Serialize)]
pub struct DecommissionGadgetResponse {
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatus,
    pub message: String,
}

impl From<Gadget> for DecommissionGadgetResponse {
    fn from(g: Gadget) -> Self {
        Self {
            id: g.id,
            name: g.name,
            status: g.status,
            message: "Gadget decommissioned".to_string(),
        }
    }
}

/// Response after a completed self-destruct.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfDestructResponse {
    pub message: String,
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatus,
    pub confirmation_code: String,
}
