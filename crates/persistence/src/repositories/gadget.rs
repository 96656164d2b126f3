//! Gadget repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::{GadgetEntity, GadgetStatusDb};
use crate::metrics::QueryTimer;
use domain::models::gadget::{Gadget, GadgetChanges, GadgetStatus};
use domain::services::gadget_store::{check_changes, GadgetStore, StoreError};

/// PostgreSQL error codes that mean the row was rejected by the schema.
const CONSTRAINT_SQLSTATES: [&str; 4] = [
    "23505", // unique_violation
    "23514", // check_violation
    "23502", // not_null_violation
    "22P02", // invalid_text_representation (bad enum value)
];

/// Maps a sqlx error onto the store error kinds.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let is_constraint = db_err
                .code()
                .map(|code| CONSTRAINT_SQLSTATES.contains(&code.as_ref()))
                .unwrap_or(false);
            if is_constraint {
                debug!(error = %db_err, "Write rejected by schema constraint");
                StoreError::Constraint(db_err.to_string())
            } else {
                StoreError::Database(db_err.to_string())
            }
        }
        sqlx::Error::PoolTimedOut => {
            warn!("Timed out waiting for a database connection");
            StoreError::Database(sqlx::Error::PoolTimedOut.to_string())
        }
        other => StoreError::Database(other.to_string()),
    }
}

/// Repository for gadget-related database operations.
#[derive(Clone)]
pub struct GadgetRepository {
    pool: PgPool,
}

impl GadgetRepository {
    /// Creates a new GadgetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new gadget with the default status.
    pub async fn insert(&self, name: &str) -> Result<GadgetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_gadget");
        let result = sqlx::query_as::<_, GadgetEntity>(
            r#"
            INSERT INTO gadgets (name)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find gadgets in creation order, optionally filtered by status.
    pub async fn find_all(
        &self,
        status: Option<GadgetStatusDb>,
    ) -> Result<Vec<GadgetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gadgets");
        let result = match status {
            Some(status) => {
                sqlx::query_as::<_, GadgetEntity>(
                    r#"
                    SELECT * FROM gadgets
                    WHERE status = $1
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, GadgetEntity>(
                    r#"
                    SELECT * FROM gadgets
                    ORDER BY created_at ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.finish(&result);
        result
    }

    /// Find gadget by UUID.
    pub async fn find_one(&self, id: Uuid) -> Result<Option<GadgetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gadget_by_id");
        let result = sqlx::query_as::<_, GadgetEntity>(
            r#"
            SELECT * FROM gadgets WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Apply a partial update inside a transaction.
    ///
    /// The row is locked with `FOR UPDATE` while the changes are checked, so
    /// the terminal `Destroyed` rule cannot be bypassed by a concurrent write.
    /// Lifecycle timestamps keep their first value.
    pub async fn apply(&self, id: Uuid, changes: GadgetChanges) -> Result<GadgetEntity, StoreError> {
        let timer = QueryTimer::new("update_gadget");
        let result = self.apply_in_transaction(id, changes).await;
        timer.finish(&result);
        result
    }

    async fn apply_in_transaction(
        &self,
        id: Uuid,
        changes: GadgetChanges,
    ) -> Result<GadgetEntity, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let current: Gadget = sqlx::query_as::<_, GadgetEntity>(
            r#"
            SELECT * FROM gadgets WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound(id))?
        .into();

        check_changes(&current, &changes)?;

        let updated = sqlx::query_as::<_, GadgetEntity>(
            r#"
            UPDATE gadgets SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                decommissioned_at = COALESCE(decommissioned_at, $4),
                destroyed_at = COALESCE(destroyed_at, $5)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.status.map(GadgetStatusDb::from))
        .bind(changes.decommissioned_at)
        .bind(changes.destroyed_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        Ok(updated)
    }
}

#[async_trait]
impl GadgetStore for GadgetRepository {
    async fn create(&self, name: &str) -> Result<Gadget, StoreError> {
        let entity = self.insert(name).await.map_err(store_error)?;
        Ok(entity.into())
    }

    async fn find_many(&self, status: Option<GadgetStatus>) -> Result<Vec<Gadget>, StoreError> {
        let entities = self
            .find_all(status.map(GadgetStatusDb::from))
            .await
            .map_err(store_error)?;
        Ok(entities.into_iter().map(Gadget::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gadget>, StoreError> {
        let entity = self.find_one(id).await.map_err(store_error)?;
        Ok(entity.map(Gadget::from))
    }

    async fn update(&self, id: Uuid, changes: GadgetChanges) -> Result<Gadget, StoreError> {
        Ok(self.apply(id, changes).await?.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
