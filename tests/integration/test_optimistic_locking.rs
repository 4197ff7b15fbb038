//! Integration tests for optimistic locking

use commerce_console_api::models::{
    CartDraft, CartUpdateAction, LocalizedField, LocalizedString, ResourceTypeId,
    TypeDefinition, TypeUpdateAction, UpdateRequest,
};
use commerce_console_api::storage::{CommerceBackend, InMemoryBackend, MutationError};

fn definition() -> TypeDefinition {
    TypeDefinition {
        id: "type-1".to_string(),
        version: 5,
        key: "customer-flags".to_string(),
        name_all_locales: vec![LocalizedField::new("en", "Flags")],
        description_all_locales: Vec::new(),
        resource_type_ids: vec![ResourceTypeId::Customer],
        field_definitions: Vec::new(),
        created_at: None,
        last_modified_at: None,
    }
}

fn rename(version: i64, name: &str) -> UpdateRequest<TypeUpdateAction> {
    UpdateRequest::new(
        "type-1",
        version,
        vec![TypeUpdateAction::ChangeName {
            name: LocalizedString::new().with("en", name),
        }],
    )
}

#[tokio::test]
async fn test_stale_version_conflicts() {
    let backend = InMemoryBackend::new();
    backend.insert_type_definition(definition()).await;

    let updated = backend.update_type_definition(rename(5, "First")).await.unwrap();
    assert_eq!(updated.version, 6);

    // A second editor still holding version 5
    let err = backend
        .update_type_definition(rename(5, "Second"))
        .await
        .unwrap_err();
    match err {
        MutationError::Conflict {
            expected_version,
            current_version,
            ..
        } => {
            assert_eq!(expected_version, 5);
            assert_eq!(current_version, Some(6));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert!(
        backend
            .update_type_definition(rename(5, "Second"))
            .await
            .unwrap_err()
            .requires_reload()
    );

    let stored = backend.fetch_type_definition("type-1").await.unwrap();
    assert_eq!(stored.name().get("en"), Some("First"));
}

#[tokio::test]
async fn test_failed_action_applies_nothing() {
    let backend = InMemoryBackend::new();
    backend.insert_type_definition(definition()).await;

    let request = UpdateRequest::new(
        "type-1",
        5,
        vec![
            TypeUpdateAction::ChangeKey {
                key: "renamed".to_string(),
            },
            TypeUpdateAction::RemoveFieldDefinition {
                field_name: "missing".to_string(),
            },
        ],
    );
    let err = backend.update_type_definition(request).await.unwrap_err();
    assert!(matches!(err, MutationError::Rejected { .. }));

    let stored = backend.fetch_type_definition("type-1").await.unwrap();
    assert_eq!(stored.key, "customer-flags");
    assert_eq!(stored.version, 5);
}

#[tokio::test]
async fn test_delete_requires_current_version() {
    let backend = InMemoryBackend::new();
    backend.insert_type_definition(definition()).await;

    let err = backend.delete_type_definition("type-1", 4).await.unwrap_err();
    assert!(matches!(err, MutationError::Conflict { .. }));

    let deleted = backend.delete_type_definition("type-1", 5).await.unwrap();
    assert_eq!(deleted.id, "type-1");
    let err = backend.fetch_type_definition("type-1").await.unwrap_err();
    assert!(matches!(err, MutationError::NotFound { .. }));
}

#[tokio::test]
async fn test_cart_versions_advance_per_update() {
    let backend = InMemoryBackend::new();
    let cart = backend
        .create_cart(CartDraft {
            currency: "EUR".to_string(),
            country: Some("DE".to_string()),
            inventory_mode: None,
        })
        .await
        .unwrap();

    let set_country = |version, country: &str| {
        UpdateRequest::new(
            cart.id.clone(),
            version,
            vec![CartUpdateAction::SetCountry {
                country: Some(country.to_string()),
            }],
        )
    };

    let updated = backend.update_cart(set_country(1, "AT")).await.unwrap();
    assert_eq!(updated.version, 2);
    let err = backend.update_cart(set_country(1, "CH")).await.unwrap_err();
    assert!(matches!(
        err,
        MutationError::Conflict {
            current_version: Some(2),
            ..
        }
    ));
    assert_eq!(backend.update_calls(), 2);
}
