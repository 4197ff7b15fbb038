//! Type definition service: fetch, create, update and delete custom types.
//!
//! Updates go through normalize -> diff -> execute. An empty diff never
//! reaches the backend.

use super::edit_session::{EditSession, SessionError};
use super::normalizer::normalize;
use super::sync_types::SyncTypes;
use super::validation::{validate_field_definition_form, validate_type_form};
use crate::models::{
    FieldDefinitionDraft, FieldDefinitionFormValues, LocalizedString, ResourceTypeId,
    TypeDefinition, TypeDraft, TypeFormValues, TypeUpdateAction, UpdateRequest,
};
use crate::storage::error::{ValidationErrors, ValidationKind};
use crate::storage::{CommerceBackend, FieldDefinitionsByName, MutationError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Result of an update that may have had nothing to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UpdateOutcome<E, A> {
    /// The draft matched the original; no request was sent
    Unchanged,
    Updated { entity: E, actions: Vec<A> },
}

impl<E, A> UpdateOutcome<E, A> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, UpdateOutcome::Unchanged)
    }
}

pub type TypeUpdateOutcome = UpdateOutcome<TypeDefinition, TypeUpdateAction>;

#[derive(Error, Debug, Clone)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Service for editing custom type definitions.
#[derive(Clone)]
pub struct TypeDefinitionService {
    backend: Arc<dyn CommerceBackend>,
    sync: SyncTypes,
}

impl TypeDefinitionService {
    /// Create a new type definition service.
    pub fn new(backend: Arc<dyn CommerceBackend>) -> Self {
        Self {
            backend,
            sync: SyncTypes::new(),
        }
    }

    pub async fn fetch(&self, id: &str) -> Result<TypeDefinition, MutationError> {
        self.backend.fetch_type_definition(id).await
    }

    pub async fn fetch_field_definitions(
        &self,
        id: &str,
        include_names: &[String],
    ) -> Result<FieldDefinitionsByName, MutationError> {
        self.backend
            .fetch_type_field_definitions(id, include_names)
            .await
    }

    /// Validate the form and compute the actions against `original`.
    pub fn prepare_actions(
        &self,
        original: &TypeDefinition,
        values: &TypeFormValues,
    ) -> Result<Vec<TypeUpdateAction>, MutationError> {
        validate_type_form(values)?;
        Ok(self
            .sync
            .build_actions(&normalize(original), &normalize(values)))
    }

    /// Submit the difference between `original` and the form values.
    pub async fn update(
        &self,
        original: &TypeDefinition,
        values: &TypeFormValues,
    ) -> Result<TypeUpdateOutcome, MutationError> {
        let actions = self.prepare_actions(original, values)?;
        if actions.is_empty() {
            info!(
                "Type definition {} unchanged, skipping update",
                original.id
            );
            return Ok(UpdateOutcome::Unchanged);
        }

        let request = UpdateRequest::new(original.id.clone(), original.version, actions.clone());
        let entity = self.backend.update_type_definition(request).await?;
        info!(
            "Updated type definition {} to version {} with {} actions",
            entity.id,
            entity.version,
            actions.len()
        );
        Ok(UpdateOutcome::Updated { entity, actions })
    }

    /// Drive an edit session through one submission.
    pub async fn submit(
        &self,
        session: &mut EditSession<TypeDefinition, TypeFormValues>,
    ) -> Result<TypeUpdateOutcome, SubmitError> {
        let ticket = session.begin_submit()?;
        let (original, draft) = match (session.original(), session.draft()) {
            (Some(original), Some(draft)) => (original.clone(), draft.clone()),
            _ => return Err(SessionError::NothingToSubmit.into()),
        };

        match self.update(&original, &draft).await {
            Ok(outcome) => {
                let baseline = match &outcome {
                    UpdateOutcome::Updated { entity, .. } => entity.clone(),
                    UpdateOutcome::Unchanged => original,
                };
                session.finish(ticket, Ok(baseline));
                Ok(outcome)
            }
            Err(err) => {
                if err.requires_reload() {
                    warn!("Type definition {} changed remotely, reload required", draft.key);
                }
                session.finish(ticket, Err(err.clone()));
                Err(err.into())
            }
        }
    }

    /// Create a type definition from the details form.
    pub async fn create(
        &self,
        values: &TypeFormValues,
        resource_type_ids: Vec<ResourceTypeId>,
    ) -> Result<TypeDefinition, MutationError> {
        let mut errors = ValidationErrors::new();
        if resource_type_ids.is_empty() {
            errors.add("resourceTypeIds", ValidationKind::Missing);
        }
        if let Err(MutationError::Validation(form_errors)) = validate_type_form(values) {
            errors.errors.extend(form_errors.errors);
        }
        errors.into_result()?;

        let snapshot = normalize(values);
        let draft = TypeDraft {
            key: snapshot.key,
            name: snapshot.name,
            description: snapshot.description,
            resource_type_ids,
            field_definitions: snapshot.field_definitions,
        };
        let created = self.backend.create_type_definition(draft).await?;
        info!("Created type definition {} ({})", created.key, created.id);
        Ok(created)
    }

    /// Add one field definition as an explicit action.
    pub async fn add_field_definition(
        &self,
        id: &str,
        version: i64,
        values: &FieldDefinitionFormValues,
    ) -> Result<TypeDefinition, MutationError> {
        validate_field_definition_form(values)?;
        let field_type = values.field_type.clone().ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add("type", ValidationKind::Missing);
            MutationError::Validation(errors)
        })?;

        let field_definition = FieldDefinitionDraft {
            name: values.name.trim().to_string(),
            label: LocalizedString::from(&values.label),
            field_type,
            required: values.required,
            input_hint: values.input_hint,
        };
        let request = UpdateRequest::new(
            id,
            version,
            vec![TypeUpdateAction::AddFieldDefinition { field_definition }],
        );
        let updated = self.backend.update_type_definition(request).await?;
        info!(
            "Added field definition {} to type definition {}",
            values.name, id
        );
        Ok(updated)
    }

    /// Remove one field definition as an explicit action.
    pub async fn remove_field_definition(
        &self,
        id: &str,
        version: i64,
        field_name: &str,
    ) -> Result<TypeDefinition, MutationError> {
        let request = UpdateRequest::new(
            id,
            version,
            vec![TypeUpdateAction::RemoveFieldDefinition {
                field_name: field_name.to_string(),
            }],
        );
        let updated = self.backend.update_type_definition(request).await?;
        info!(
            "Removed field definition {} from type definition {}",
            field_name, id
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: &str, version: i64) -> Result<TypeDefinition, MutationError> {
        let deleted = self.backend.delete_type_definition(id, version).await?;
        info!("Deleted type definition {}", id);
        Ok(deleted)
    }
}
