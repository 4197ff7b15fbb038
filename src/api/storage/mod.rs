//! Storage module for the API.
//!
//! Provides the commerce backends: the remote GraphQL API and an in-memory store.

pub mod error;
pub mod traits;

// Backend implementations
pub mod graphql;
pub mod memory;

pub use error::{MutationError, RemoteError, ValidationErrors};
pub use graphql::GraphQlBackend;
pub use memory::InMemoryBackend;
pub use traits::{CommerceBackend, FieldDefinitionsByName};
