//! Action synthesizer for type definitions.
//!
//! Compares two normalized snapshots and produces the ordered list of update
//! actions that turns the first into the second.

use super::normalizer::TypeSnapshot;
use crate::models::TypeUpdateAction;
use std::collections::HashSet;
use tracing::debug;

/// Stateless synthesizer; construct wherever it is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncTypes;

impl SyncTypes {
    pub fn new() -> Self {
        Self
    }

    /// Build the actions that bring `original` to `next`.
    ///
    /// Scalar fields come first in the order name, description, key, followed
    /// by one `addFieldDefinition` per field definition of `next` whose name
    /// is not present in `original`. Existing field definitions are never
    /// changed, removed or reordered here.
    pub fn build_actions(
        &self,
        original: &TypeSnapshot,
        next: &TypeSnapshot,
    ) -> Vec<TypeUpdateAction> {
        let mut actions = Vec::new();

        if next.name != original.name {
            actions.push(TypeUpdateAction::ChangeName {
                name: next.name.clone(),
            });
        }
        if next.description != original.description {
            actions.push(TypeUpdateAction::SetDescription {
                description: next.description.clone(),
            });
        }
        if next.key != original.key {
            actions.push(TypeUpdateAction::ChangeKey {
                key: next.key.clone(),
            });
        }

        let mut known: HashSet<&str> = original
            .field_definitions
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        for definition in &next.field_definitions {
            if known.insert(definition.name.as_str()) {
                actions.push(TypeUpdateAction::AddFieldDefinition {
                    field_definition: definition.clone(),
                });
            }
        }

        debug!(
            "Synthesized {} type update actions: {:?}",
            actions.len(),
            actions.iter().map(|a| a.action_name()).collect::<Vec<_>>()
        );
        actions
    }
}

/// Shorthand for [`SyncTypes::build_actions`].
pub fn diff(original: &TypeSnapshot, next: &TypeSnapshot) -> Vec<TypeUpdateAction> {
    SyncTypes::new().build_actions(original, next)
}

/// Apply actions to a snapshot in order, the way the remote API would.
pub fn apply_type_actions(snapshot: &TypeSnapshot, actions: &[TypeUpdateAction]) -> TypeSnapshot {
    let mut result = snapshot.clone();
    for action in actions {
        match action {
            TypeUpdateAction::ChangeName { name } => result.name = name.clone(),
            TypeUpdateAction::SetDescription { description } => {
                result.description = description.clone()
            }
            TypeUpdateAction::ChangeKey { key } => result.key = key.clone(),
            TypeUpdateAction::AddFieldDefinition { field_definition } => {
                result.field_definitions.push(field_definition.clone())
            }
            TypeUpdateAction::RemoveFieldDefinition { field_name } => result
                .field_definitions
                .retain(|f| &f.name != field_name),
        }
    }
    result
}
