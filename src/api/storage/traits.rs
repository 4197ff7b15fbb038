//! Backend trait for the remote commerce API.

use super::MutationError;
use crate::models::{
    Cart, CartDraft, CartUpdateAction, FieldDefinition, TypeDefinition, TypeDraft,
    TypeUpdateAction, UpdateRequest,
};
use serde::{Deserialize, Serialize};

/// Version plus a subset of field definitions of a type definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinitionsByName {
    pub version: i64,
    pub field_definitions: Vec<FieldDefinition>,
}

/// Remote commerce API.
///
/// Each call issues exactly one request and never retries. Update calls
/// carry the version the caller last observed and return the entity with its
/// new version.
#[async_trait::async_trait]
pub trait CommerceBackend: Send + Sync {
    /// Get a type definition by ID
    async fn fetch_type_definition(&self, id: &str) -> Result<TypeDefinition, MutationError>;

    /// Get the version and the named field definitions of a type definition
    async fn fetch_type_field_definitions(
        &self,
        id: &str,
        include_names: &[String],
    ) -> Result<FieldDefinitionsByName, MutationError>;

    /// Create a new type definition
    async fn create_type_definition(
        &self,
        draft: TypeDraft,
    ) -> Result<TypeDefinition, MutationError>;

    /// Apply update actions to a type definition with optimistic locking
    async fn update_type_definition(
        &self,
        request: UpdateRequest<TypeUpdateAction>,
    ) -> Result<TypeDefinition, MutationError>;

    /// Delete a type definition
    async fn delete_type_definition(
        &self,
        id: &str,
        version: i64,
    ) -> Result<TypeDefinition, MutationError>;

    /// Get a cart by ID
    async fn fetch_cart(&self, id: &str) -> Result<Cart, MutationError>;

    /// Create a new cart
    async fn create_cart(&self, draft: CartDraft) -> Result<Cart, MutationError>;

    /// Apply update actions to a cart with optimistic locking
    async fn update_cart(
        &self,
        request: UpdateRequest<CartUpdateAction>,
    ) -> Result<Cart, MutationError>;
}
