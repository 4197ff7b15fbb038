//! Services module - normalization, action synthesis and the flows behind the console screens.

pub mod cart_service;
pub mod edit_session;
pub mod items_table;
pub mod normalizer;
pub mod sync_types;
pub mod type_definition_service;
pub mod validation;

// Re-export for convenience
pub use cart_service::{CartService, CurrencyStepOutcome, CurrencyStepValues};
pub use edit_session::{EditSession, FinishOutcome, SessionError, SessionState, SubmitTicket};
pub use normalizer::{TypeSnapshot, normalize};
pub use sync_types::{SyncTypes, apply_type_actions, diff};
pub use type_definition_service::{SubmitError, TypeDefinitionService, UpdateOutcome};
