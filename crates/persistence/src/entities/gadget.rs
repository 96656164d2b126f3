//! Gadget entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::gadget::{Gadget, GadgetStatus};

/// Database enum for gadget status (`gadget_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gadget_status")]
pub enum GadgetStatusDb {
    Available,
    Deployed,
    Decommissioned,
    Destroyed,
}

impl From<GadgetStatus> for GadgetStatusDb {
    fn from(status: GadgetStatus) -> Self {
        match status {
            GadgetStatus::Available => Self::Available,
            GadgetStatus::Deployed => Self::Deployed,
            GadgetStatus::Decommissioned => Self::Decommissioned,
            GadgetStatus::Destroyed => Self::Destroyed,
        }
    }
}

impl From<GadgetStatusDb> for GadgetStatus {
    fn from(status: GadgetStatusDb) -> Self {
        match status {
            GadgetStatusDb::Available => Self::Available,
            GadgetStatusDb::Deployed => Self::Deployed,
            GadgetStatusDb::Decommissioned => Self::Decommissioned,
            GadgetStatusDb::Destroyed => Self::Destroyed,
        }
    }
}

/// Database row mapping for the gadgets table.
#[derive(Debug, Clone, FromRow)]
pub struct GadgetEntity {
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatusDb,
    pub created_at: DateTime<Utc>,
    pub decommissioned_at: Option<DateTime<Utc>>,
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl From<GadgetEntity> for Gadget {
    fn from(entity: GadgetEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            status: entity.status.into(),
            created_at: entity.created_at,
            decommissioned_at: entity.decommissioned_at,
            destroyed_at: entity.destroyed_at,
        }
    }
}
