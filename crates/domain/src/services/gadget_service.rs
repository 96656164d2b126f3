//! Gadget lifecycle service.
//!
//! Holds the decision logic behind the gadget endpoints: listing with
//! success chances, creation with generated names, partial updates,
//! decommissioning and the self-destruct confirmation flow.

use std::sync::Arc;

use chrono::Utc;
use shared::confirmation::{codes_match, generate_confirmation_code};
use shared::naming::{name_or_fallback, random_gadget_name};
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use super::gadget_store::{GadgetStore, StoreError};
use crate::models::gadget::{
    parse_gadget_id, Gadget, GadgetChanges, GadgetStatus, ListGadgetsQuery, UpdateGadgetRequest,
};

/// Errors produced by gadget operations.
#[derive(Debug, Error)]
pub enum GadgetError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Gadget not found")]
    NotFound,

    #[error("Confirmation code mismatch")]
    ConfirmationMismatch,

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

fn validation_message(errors: ValidationErrors) -> GadgetError {
    let messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    GadgetError::Validation(messages.join(", "))
}

/// Outcome of a completed self-destruct.
#[derive(Debug, Clone)]
pub struct SelfDestructOutcome {
    pub gadget: Gadget,
    pub confirmation_code: String,
}

/// Gadget operations over an injected store.
#[derive(Clone)]
pub struct GadgetService {
    store: Arc<dyn GadgetStore>,
}

impl GadgetService {
    pub fn new(store: Arc<dyn GadgetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn GadgetStore> {
        &self.store
    }

    /// Lists gadgets as `The {Name} - {N}% success probability` labels.
    ///
    /// The status filter is validated before the store is queried. The chance
    /// is rolled on every call and never stored.
    pub async fn list_with_chances(
        &self,
        query: &ListGadgetsQuery,
    ) -> Result<Vec<String>, GadgetError> {
        query.validate().map_err(validation_message)?;

        let gadgets = self.store.find_many(query.status_filter()).await?;
        Ok(gadgets.iter().map(Gadget::label_with_chance).collect())
    }

    /// Creates a gadget with a generated name. Client input never supplies the name.
    pub async fn create(&self) -> Result<Gadget, GadgetError> {
        self.create_from(Some(random_gadget_name())).await
    }

    async fn create_from(&self, generated: Option<String>) -> Result<Gadget, GadgetError> {
        let name = name_or_fallback(generated);
        let gadget = self.store.create(&name).await?;

        info!(gadget_id = %gadget.id, name = %gadget.name, "Gadget created");
        Ok(gadget)
    }

    /// Partial update of name and/or status.
    ///
    /// No existence check: a missing gadget surfaces as a persistence failure.
    pub async fn update(&self, request: UpdateGadgetRequest) -> Result<Gadget, GadgetError> {
        let id = parse_gadget_id(&request.id).ok_or_else(|| {
            StoreError::Constraint(format!("invalid gadget id: {}", request.id))
        })?;

        let status = match request.status.as_deref() {
            Some(raw) => Some(GadgetStatus::parse(raw).ok_or_else(|| {
                StoreError::Constraint(format!("invalid gadget status: {}", raw))
            })?),
            None => None,
        };

        let changes = GadgetChanges::edit(request.name, status, Utc::now());
        let gadget = self.store.update(id, changes).await?;

        info!(gadget_id = %gadget.id, status = %gadget.status, "Gadget updated");
        Ok(gadget)
    }

    /// Marks a gadget `Decommissioned`.
    ///
    /// The write is attempted first; only when it fails is the gadget looked
    /// up, to tell a missing gadget apart from any other failure.
    pub async fn decommission(&self, raw_id: &str) -> Result<Gadget, GadgetError> {
        let id = parse_gadget_id(raw_id).ok_or(GadgetError::NotFound)?;

        match self
            .store
            .update(id, GadgetChanges::decommission(Utc::now()))
            .await
        {
            Ok(gadget) => {
                info!(gadget_id = %gadget.id, "Gadget decommissioned");
                Ok(gadget)
            }
            Err(update_err) => match self.store.find_by_id(id).await {
                Ok(None) => Err(GadgetError::NotFound),
                Ok(Some(_)) => Err(update_err.into()),
                Err(probe_err) => {
                    warn!(gadget_id = %id, error = %probe_err, "Existence probe failed");
                    Err(update_err.into())
                }
            },
        }
    }

    /// Destroys a gadget after the confirmation code check.
    pub async fn self_destruct(&self, raw_id: &str) -> Result<SelfDestructOutcome, GadgetError> {
        let id = parse_gadget_id(raw_id).ok_or(GadgetError::NotFound)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(GadgetError::NotFound)?;

        // The submitted code is the freshly generated one, so this check cannot fail today.
        let confirmation_code = generate_confirmation_code();
        let submitted = confirmation_code.clone();
        if !codes_match(&confirmation_code, &submitted) {
            return Err(GadgetError::ConfirmationMismatch);
        }

        let gadget = self
            .store
            .update(id, GadgetChanges::destroy(Utc::now()))
            .await?;

        info!(gadget_id = %gadget.id, "Gadget self-destructed");
        Ok(SelfDestructOutcome {
            gadget,
            confirmation_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::InMemoryGadgetStore;
    use shared::naming::FALLBACK_GADGET_NAME;
    use uuid::Uuid;

    fn service_with(store: InMemoryGadgetStore) -> (GadgetService, Arc<InMemoryGadgetStore>) {
        let store = Arc::new(store);
        (GadgetService::new(store.clone()), store)
    }

    fn status_query(status: Option<&str>) -> ListGadgetsQuery {
        ListGadgetsQuery {
            status: status.map(str::to_string),
        }
    }

    fn update_request(id: &str, name: Option<&str>, status: Option<&str>) -> UpdateGadgetRequest {
        UpdateGadgetRequest {
            id: id.to_string(),
            name: name.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_generates_name() {
        let (service, _) = service_with(InMemoryGadgetStore::new());
        let gadget = service.create().await.unwrap();

        assert!(!gadget.name.is_empty());
        assert_eq!(gadget.name.split('-').count(), 3);
        assert_eq!(gadget.status, GadgetStatus::Available);
    }

    #[tokio::test]
    async fn test_create_falls_back_when_generator_yields_nothing() {
        let (service, _) = service_with(InMemoryGadgetStore::new());

        let gadget = service.create_from(None).await.unwrap();
        assert_eq!(gadget.name, FALLBACK_GADGET_NAME);

        let gadget = service.create_from(Some(String::new())).await.unwrap();
        assert_eq!(gadget.name, FALLBACK_GADGET_NAME);
    }

    #[tokio::test]
    async fn test_create_is_not_idempotent() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let a = service.create().await.unwrap();
        let b = service.create().await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.find_many(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_store_failure() {
        let (service, _) = service_with(InMemoryGadgetStore::failing());
        let result = service.create().await;
        assert!(matches!(result, Err(GadgetError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_list_with_chances_filters_by_status() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let deployed = store.create("deployed-one").await.unwrap();
        store.create("available-one").await.unwrap();
        service
            .update(update_request(&deployed.id.to_string(), None, Some("Deployed")))
            .await
            .unwrap();

        let labels = service
            .list_with_chances(&status_query(Some("Deployed")))
            .await
            .unwrap();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].starts_with("The Deployed-one - "));
        assert!(labels[0].ends_with("% success probability"));

        let all = service.list_with_chances(&status_query(None)).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_with_chances_rejects_unknown_status_before_querying() {
        // A failing store proves the store is never reached.
        let (service, _) = service_with(InMemoryGadgetStore::failing());
        let result = service
            .list_with_chances(&status_query(Some("InvalidValue")))
            .await;

        match result {
            Err(GadgetError::Validation(message)) => {
                assert!(message.contains("Available, Deployed, Decommissioned, Destroyed"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_with_chances_is_not_deterministic() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        store.create("bold-ox-1234").await.unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..30 {
            let labels = service.list_with_chances(&status_query(None)).await.unwrap();
            seen.insert(labels[0].clone());
        }
        assert!(seen.len() > 1);
    }

    #[tokio::test]
    async fn test_list_with_chances_store_failure() {
        let (service, _) = service_with(InMemoryGadgetStore::failing());
        let result = service.list_with_chances(&status_query(None)).await;
        assert!(matches!(result, Err(GadgetError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_update_name_and_status() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();

        let updated = service
            .update(update_request(
                &gadget.id.to_string(),
                Some("sly-ram-2000"),
                Some("Deployed"),
            ))
            .await
            .unwrap();

        assert_eq!(updated.id, gadget.id);
        assert_eq!(updated.name, "sly-ram-2000");
        assert_eq!(updated.status, GadgetStatus::Deployed);
    }

    #[tokio::test]
    async fn test_update_to_decommissioned_stamps_timestamp() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();

        let updated = service
            .update(update_request(&gadget.id.to_string(), None, Some("Decommissioned")))
            .await
            .unwrap();
        assert!(updated.decommissioned_at.is_some());
        assert!(updated.destroyed_at.is_none());
    }

    #[tokio::test]
    async fn test_update_invalid_status_is_persistence_failure() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();

        let result = service
            .update(update_request(&gadget.id.to_string(), None, Some("Lost")))
            .await;
        assert!(matches!(
            result,
            Err(GadgetError::Persistence(StoreError::Constraint(_)))
        ));

        let stored = store.find_by_id(gadget.id).await.unwrap().unwrap();
        assert_eq!(stored.status, GadgetStatus::Available);
    }

    #[tokio::test]
    async fn test_update_missing_gadget_is_persistence_failure() {
        let (service, _) = service_with(InMemoryGadgetStore::new());

        let result = service
            .update(update_request(&Uuid::new_v4().to_string(), Some("x"), None))
            .await;
        assert!(matches!(
            result,
            Err(GadgetError::Persistence(StoreError::NotFound(_)))
        ));

        let result = service.update(update_request("nope", Some("x"), None)).await;
        assert!(matches!(result, Err(GadgetError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_decommission_existing_gadget() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();

        let decommissioned = service.decommission(&gadget.id.to_string()).await.unwrap();
        assert_eq!(decommissioned.status, GadgetStatus::Decommissioned);
        assert_eq!(decommissioned.name, gadget.name);
        assert!(decommissioned.decommissioned_at.is_some());
    }

    #[tokio::test]
    async fn test_decommission_missing_gadget() {
        let (service, _) = service_with(InMemoryGadgetStore::new());

        let result = service.decommission(&Uuid::new_v4().to_string()).await;
        assert!(matches!(result, Err(GadgetError::NotFound)));

        let result = service.decommission("not-a-uuid").await;
        assert!(matches!(result, Err(GadgetError::NotFound)));
    }

    #[tokio::test]
    async fn test_decommission_failure_on_existing_gadget_is_not_not_found() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();
        service.self_destruct(&gadget.id.to_string()).await.unwrap();

        let result = service.decommission(&gadget.id.to_string()).await;
        assert!(matches!(
            result,
            Err(GadgetError::Persistence(StoreError::Constraint(_)))
        ));
    }

    #[tokio::test]
    async fn test_decommission_twice_keeps_first_timestamp() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();
        let id = gadget.id.to_string();

        let first = service.decommission(&id).await.unwrap();
        let second = service.decommission(&id).await.unwrap();
        assert_eq!(first.decommissioned_at, second.decommissioned_at);
    }

    #[tokio::test]
    async fn test_self_destruct_existing_gadget() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();

        let outcome = service.self_destruct(&gadget.id.to_string()).await.unwrap();
        assert_eq!(outcome.gadget.status, GadgetStatus::Destroyed);
        assert!(outcome.gadget.destroyed_at.is_some());
        assert_eq!(
            outcome.confirmation_code.len(),
            shared::confirmation::CONFIRMATION_CODE_LENGTH
        );

        let stored = store.find_by_id(gadget.id).await.unwrap().unwrap();
        assert_eq!(stored.status, GadgetStatus::Destroyed);
    }

    #[tokio::test]
    async fn test_self_destruct_missing_gadget_mutates_nothing() {
        let (service, store) = service_with(InMemoryGadgetStore::new());
        let gadget = store.create("bold-ox-1234").await.unwrap();

        let result = service.self_destruct(&Uuid::new_v4().to_string()).await;
        assert!(matches!(result, Err(GadgetError::NotFound)));

        let result = service.self_destruct("garbage").await;
        assert!(matches!(result, Err(GadgetError::NotFound)));

        let stored = store.find_by_id(gadget.id).await.unwrap().unwrap();
        assert_eq!(stored, gadget);
    }

    #[tokio::test]
    async fn test_self_destruct_store_failure() {
        let (service, _) = service_with(InMemoryGadgetStore::failing());
        let result = service.self_destruct(&Uuid::new_v4().to_string()).await;
        assert!(matches!(result, Err(GadgetError::Persistence(_))));
    }

    #[test]
    fn test_gadget_error_display() {
        assert_eq!(GadgetError::NotFound.to_string(), "Gadget not found");
        assert_eq!(
            GadgetError::ConfirmationMismatch.to_string(),
            "Confirmation code mismatch"
        );
        assert_eq!(
            GadgetError::Validation("bad".into()).to_string(),
            "Validation error: bad"
        );
        assert_eq!(
            GadgetError::Persistence(StoreError::Database("down".into())).to_string(),
            "Database error: down"
        );
    }
}
