//! GraphQL backend for the remote commerce API.
//!
//! Sends one GraphQL document per call and classifies the `errors` array of
//! the response into [`MutationError`] variants.

use super::{CommerceBackend, FieldDefinitionsByName, MutationError, RemoteError};
use crate::models::{
    Cart, CartDraft, CartUpdateAction, FieldDefinitionDraft, FieldType, TypeDefinition,
    TypeDraft, TypeUpdateAction, UpdateRequest,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, error, warn};
use url::Url;

const FIELD_DEFINITION_FRAGMENT: &str = r#"
fragment FieldDefinitionFields on FieldDefinition {
  name
  required
  inputHint
  labelAllLocales { locale value }
  type {
    name
    ... on EnumType { values { key label } }
    ... on LocalizedEnumType { values { key labelAllLocales { locale value } } }
    ... on ReferenceType { referenceTypeId }
    ... on SetType { elementType { name ... on ReferenceType { referenceTypeId } } }
  }
}
"#;

const TYPE_DEFINITION_SELECTION: &str = r#"
  id
  version
  key
  nameAllLocales { locale value }
  descriptionAllLocales { locale value }
  resourceTypeIds
  createdAt
  lastModifiedAt
  fieldDefinitions { ...FieldDefinitionFields }
"#;

const MONEY_SELECTION: &str = "{ currencyCode centAmount fractionDigits }";

/// Error codes with a dedicated classification.
const CONCURRENT_MODIFICATION: &str = "ConcurrentModification";
const RESOURCE_NOT_FOUND: &str = "ResourceNotFound";
const GRAPHQL_VALIDATION_FAILED: &str = "GRAPHQL_VALIDATION_FAILED";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub current_version: Option<i64>,
    #[serde(default)]
    pub field: Option<String>,
}

impl GraphQlError {
    fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

/// The entity a request targets, used to describe conflicts and missing entities.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub entity_type: &'a str,
    pub entity_id: &'a str,
    pub version: Option<i64>,
}

/// Map a non-empty GraphQL `errors` array to a single error.
pub fn classify_errors(errors: &[GraphQlError], target: Target<'_>) -> MutationError {
    if let Some(conflict) = errors
        .iter()
        .find(|e| e.code() == Some(CONCURRENT_MODIFICATION))
    {
        let current_version = conflict.extensions.as_ref().and_then(|e| e.current_version);
        return MutationError::conflict(
            target.entity_type,
            target.entity_id,
            target.version.unwrap_or_default(),
            current_version,
        );
    }

    if errors.iter().any(|e| e.code() == Some(RESOURCE_NOT_FOUND)) {
        return MutationError::not_found(target.entity_type, target.entity_id);
    }

    if let Some(schema) = errors
        .iter()
        .find(|e| matches!(e.code(), None | Some(GRAPHQL_VALIDATION_FAILED)))
    {
        error!(
            "GraphQL schema error for {} {}: {}",
            target.entity_type, target.entity_id, schema.message
        );
        return MutationError::schema(schema.message.clone());
    }

    MutationError::Rejected {
        errors: errors
            .iter()
            .map(|e| RemoteError {
                code: e.code().unwrap_or_default().to_string(),
                message: e.message.clone(),
                field: e.extensions.as_ref().and_then(|x| x.field.clone()),
            })
            .collect(),
    }
}

/// Field type in the one-key-per-type input shape, e.g. `{"String": {}}`.
pub fn field_type_input(field_type: &FieldType) -> Value {
    let body = match field_type {
        FieldType::Enum { values } => json!({ "values": values }),
        FieldType::LocalizedEnum { values } => json!({ "values": values }),
        FieldType::Reference { reference_type_id } => {
            json!({ "referenceTypeId": reference_type_id })
        }
        FieldType::Set { element_type } => json!({ "elementType": field_type_input(element_type) }),
        FieldType::Boolean
        | FieldType::Number
        | FieldType::String
        | FieldType::LocalizedString
        | FieldType::Money
        | FieldType::Date
        | FieldType::Time
        | FieldType::DateTime => json!({}),
    };
    let mut input = Map::new();
    input.insert(field_type.type_name().to_string(), body);
    Value::Object(input)
}

fn field_definition_input(definition: &FieldDefinitionDraft) -> Value {
    json!({
        "name": definition.name,
        "label": definition.label,
        "type": field_type_input(&definition.field_type),
        "required": definition.required,
        "inputHint": definition.input_hint,
    })
}

/// Convert type update actions into `TypeUpdateAction` GraphQL inputs.
pub fn type_actions_input(actions: &[TypeUpdateAction]) -> Result<Vec<Value>, MutationError> {
    actions
        .iter()
        .map(|action| match action {
            TypeUpdateAction::AddFieldDefinition { field_definition } => Ok(json!({
                "addFieldDefinition": {
                    "fieldDefinition": field_definition_input(field_definition)
                }
            })),
            other => serde_json::to_value(other).map_err(|e| {
                MutationError::schema(format!(
                    "Failed to encode {} action: {}",
                    other.action_name(),
                    e
                ))
            }),
        })
        .collect()
}

fn type_draft_input(draft: &TypeDraft) -> Value {
    json!({
        "key": draft.key,
        "name": draft.name,
        "description": draft.description,
        "resourceTypeIds": draft.resource_type_ids,
        "fieldDefinitions": draft
            .field_definitions
            .iter()
            .map(field_definition_input)
            .collect::<Vec<_>>(),
    })
}

fn cart_selection() -> String {
    let money = MONEY_SELECTION;
    let taxed = format!("{{ totalNet {money} totalGross {money} }}");
    let tax_rate = "{ name amount includedInPrice country }";
    format!(
        r#"
  id
  version
  country
  inventoryMode
  store {{ id key }}
  totalPrice {money}
  lineItems {{
    id
    productId
    nameAllLocales {{ locale value }}
    variant {{ sku }}
    quantity
    price {{ value {money} }}
    totalPrice {money}
    taxedPrice {taxed}
    taxRate {tax_rate}
  }}
  customLineItems {{
    id
    nameAllLocales {{ locale value }}
    slug
    quantity
    money {money}
    totalPrice {money}
    taxedPrice {taxed}
    taxRate {tax_rate}
  }}
"#
    )
}

fn type_document(operation: &str) -> String {
    format!("{operation} {{ {TYPE_DEFINITION_SELECTION} }} }}\n{FIELD_DEFINITION_FRAGMENT}")
}

/// Backend talking to `{api_url}/{project_key}/graphql`.
#[derive(Clone)]
pub struct GraphQlBackend {
    endpoint: Url,
    access_token: Option<String>,
    http_client: reqwest::Client,
}

impl GraphQlBackend {
    pub fn new(
        api_url: &Url,
        project_key: &str,
        access_token: Option<String>,
    ) -> Result<Self, url::ParseError> {
        let base = if api_url.as_str().ends_with('/') {
            api_url.clone()
        } else {
            Url::parse(&format!("{}/", api_url))?
        };
        let endpoint = base.join(&format!("{}/graphql", project_key))?;
        Ok(Self {
            endpoint,
            access_token,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run one GraphQL document and decode `data.{field}`.
    async fn execute<T: DeserializeOwned>(
        &self,
        field: &str,
        query: String,
        variables: Value,
        target: Target<'_>,
    ) -> Result<T, MutationError> {
        debug!("GraphQL {} for {} {}", field, target.entity_type, target.entity_id);

        let mut request = self
            .http_client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!("GraphQL request {} failed to send: {}", field, e);
            MutationError::transport(format!("Failed to send {} request: {}", field, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            MutationError::transport(format!("Failed to read {} response: {}", field, e))
        })?;
        let parsed = serde_json::from_str::<GraphQlResponse>(&body);

        if let Ok(parsed) = &parsed
            && !parsed.errors.is_empty()
        {
            let err = classify_errors(&parsed.errors, target);
            warn!("GraphQL {} returned errors: {}", field, err);
            return Err(err);
        }

        if status == StatusCode::CONFLICT {
            return Err(MutationError::conflict(
                target.entity_type,
                target.entity_id,
                target.version.unwrap_or_default(),
                None,
            ));
        }
        if !status.is_success() {
            warn!("GraphQL {} failed with HTTP {}", field, status);
            return Err(MutationError::transport(format!(
                "{} failed with HTTP {}: {}",
                field, status, body
            )));
        }

        let parsed = parsed.map_err(|e| {
            error!("Undecodable {} response: {}", field, e);
            MutationError::schema(format!("Undecodable {} response: {}", field, e))
        })?;
        let Some(data) = parsed.data else {
            return Err(MutationError::not_found(target.entity_type, target.entity_id));
        };
        let value = data.get(field).cloned().unwrap_or(Value::Null);
        if value.is_null() {
            return Err(MutationError::not_found(target.entity_type, target.entity_id));
        }
        serde_json::from_value(value).map_err(|e| {
            error!("Unexpected {} response shape: {}", field, e);
            MutationError::schema(format!("Unexpected {} response shape: {}", field, e))
        })
    }
}

#[async_trait]
impl CommerceBackend for GraphQlBackend {
    async fn fetch_type_definition(&self, id: &str) -> Result<TypeDefinition, MutationError> {
        let query = type_document("query FetchType($id: String!) { typeDefinition(id: $id)");
        self.execute(
            "typeDefinition",
            query,
            json!({ "id": id }),
            Target {
                entity_type: "type-definition",
                entity_id: id,
                version: None,
            },
        )
        .await
    }

    async fn fetch_type_field_definitions(
        &self,
        id: &str,
        include_names: &[String],
    ) -> Result<FieldDefinitionsByName, MutationError> {
        let query = format!(
            r#"query FetchTypeWithDefinitionByName($id: String!, $includeNames: [String!]) {{
  typeDefinition(id: $id) {{
    version
    fieldDefinitions(includeNames: $includeNames) {{ ...FieldDefinitionFields }}
  }}
}}
{FIELD_DEFINITION_FRAGMENT}"#
        );
        self.execute(
            "typeDefinition",
            query,
            json!({ "id": id, "includeNames": include_names }),
            Target {
                entity_type: "type-definition",
                entity_id: id,
                version: None,
            },
        )
        .await
    }

    async fn create_type_definition(
        &self,
        draft: TypeDraft,
    ) -> Result<TypeDefinition, MutationError> {
        let query = type_document(
            "mutation CreateType($draft: TypeDefinitionDraft!) { createTypeDefinition(draft: $draft)",
        );
        self.execute(
            "createTypeDefinition",
            query,
            json!({ "draft": type_draft_input(&draft) }),
            Target {
                entity_type: "type-definition",
                entity_id: &draft.key,
                version: None,
            },
        )
        .await
    }

    async fn update_type_definition(
        &self,
        request: UpdateRequest<TypeUpdateAction>,
    ) -> Result<TypeDefinition, MutationError> {
        let actions = type_actions_input(&request.actions)?;
        let query = type_document(
            "mutation UpdateType($id: String!, $version: Long!, $actions: [TypeUpdateAction!]!) { updateTypeDefinition(id: $id, version: $version, actions: $actions)",
        );
        self.execute(
            "updateTypeDefinition",
            query,
            json!({ "id": request.id, "version": request.version, "actions": actions }),
            Target {
                entity_type: "type-definition",
                entity_id: &request.id,
                version: Some(request.version),
            },
        )
        .await
    }

    async fn delete_type_definition(
        &self,
        id: &str,
        version: i64,
    ) -> Result<TypeDefinition, MutationError> {
        let query = type_document(
            "mutation DeleteType($id: String!, $version: Long!) { deleteTypeDefinition(id: $id, version: $version)",
        );
        self.execute(
            "deleteTypeDefinition",
            query,
            json!({ "id": id, "version": version }),
            Target {
                entity_type: "type-definition",
                entity_id: id,
                version: Some(version),
            },
        )
        .await
    }

    async fn fetch_cart(&self, id: &str) -> Result<Cart, MutationError> {
        let query = format!(
            "query FetchCart($id: String!) {{ cart(id: $id) {{ {} }} }}",
            cart_selection()
        );
        self.execute(
            "cart",
            query,
            json!({ "id": id }),
            Target {
                entity_type: "cart",
                entity_id: id,
                version: None,
            },
        )
        .await
    }

    async fn create_cart(&self, draft: CartDraft) -> Result<Cart, MutationError> {
        let query = format!(
            "mutation CreateCart($draft: CartDraft!) {{ createCart(draft: $draft) {{ {} }} }}",
            cart_selection()
        );
        self.execute(
            "createCart",
            query,
            json!({ "draft": draft }),
            Target {
                entity_type: "cart",
                entity_id: "new",
                version: None,
            },
        )
        .await
    }

    async fn update_cart(
        &self,
        request: UpdateRequest<CartUpdateAction>,
    ) -> Result<Cart, MutationError> {
        let query = format!(
            "mutation UpdateCart($id: String!, $version: Long!, $actions: [CartUpdateAction!]!) {{ updateCart(id: $id, version: $version, actions: $actions) {{ {} }} }}",
            cart_selection()
        );
        self.execute(
            "updateCart",
            query,
            json!({ "id": request.id, "version": request.version, "actions": request.actions }),
            Target {
                entity_type: "cart",
                entity_id: &request.id,
                version: Some(request.version),
            },
        )
        .await
    }
}
