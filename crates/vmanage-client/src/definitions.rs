use std::borrow::Cow;

use serde_json::Value;

use tracing::{debug, warn};

use vmanage::definition::{
    Category, Definition, DefinitionSummary, DefinitionType, HUB_AND_SPOKE, PolicyDefinition,
};

use crate::client::Client;
use crate::collection::{Dict, list_to_dict};
use crate::error::{Error, ErrorKind, Result};
use crate::response::{is_empty_value, parse_list};
use crate::transport::{Method, Transport};

const DEFINITION_API: &str = "template/policy/definition";

// Position of the definition types column in the header of a listing.
const TYPES_COLUMN: usize = 1;

/// The default field used to key a collection of definitions.
pub const DEFINITION_NAME: &str = "name";

fn discovery_error(info: impl Into<Cow<'static, str>>) -> Error {
    Error::new(ErrorKind::Discovery, info)
}

fn definition_api(definition_type: &DefinitionType, definition_id: Option<&str>) -> String {
    match definition_id {
        Some(definition_id) => format!("{DEFINITION_API}/{definition_type}/{definition_id}"),
        None => format!("{DEFINITION_API}/{definition_type}"),
    }
}

/// Extracts the definition types published in the header of a definition
/// listing.
///
/// The types are the keys of the `keyvalue` list of the second header
/// column, returned lowercased and in server order.
///
/// # Errors
///
/// A [`ErrorKind::Discovery`] error is returned when the header does not
/// have the expected shape.
pub fn discover_definition_types(listing: &Value) -> Result<Vec<DefinitionType>> {
    let entries = listing
        .get("header")
        .and_then(|header| header.get("columns"))
        .and_then(Value::as_array)
        .and_then(|columns| columns.get(TYPES_COLUMN))
        .and_then(|column| column.get("keyvalue"))
        .and_then(Value::as_array)
        .ok_or_else(|| discovery_error("Could not retrieve definition types"))?;

    entries
        .iter()
        .map(|entry| {
            let key = entry.get("key").and_then(Value::as_str).ok_or_else(|| {
                discovery_error(format!("Could not retrieve a definition type from `{entry}`"))
            })?;
            DefinitionType::new(key)
                .map_err(|_| discovery_error("Could not retrieve an empty definition type"))
        })
        .collect()
}

fn into_definition(json: Value) -> Result<Definition> {
    match json {
        Value::Object(fields) => Ok(Definition::from(fields)),
        json if is_empty_value(&json) => Ok(Definition::new()),
        json => Err(Error::new(
            ErrorKind::MalformedResponse,
            format!("Expected a definition object, found `{json}`"),
        )),
    }
}

/// The policy definitions API of a controller.
///
/// Definitions are used in centralized, localized, and security policies.
#[derive(Debug)]
pub struct PolicyDefinitions<'client, T: Transport> {
    client: &'client Client<T>,
}

impl<'client, T: Transport> PolicyDefinitions<'client, T> {
    pub(crate) const fn new(client: &'client Client<T>) -> Self {
        Self { client }
    }

    /// Deletes a policy definition.
    ///
    /// # Errors
    ///
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn delete(&self, definition_type: &DefinitionType, definition_id: &str) -> Result<()> {
        let _ = self
            .client
            .send(
                Method::DELETE,
                &definition_api(definition_type, Some(definition_id)),
                None,
            )
            .await?;
        Ok(())
    }

    /// Creates a policy definition.
    ///
    /// # Errors
    ///
    /// An error is returned when the definition cannot be encoded.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn add(&self, definition: &PolicyDefinition) -> Result<()> {
        let payload = serde_json::to_string(definition)?;
        let _ = self
            .client
            .send(
                Method::POST,
                &definition_api(&definition.kind, None),
                Some(payload),
            )
            .await?;
        Ok(())
    }

    /// Replaces the policy definition with the given identifier.
    ///
    /// # Errors
    ///
    /// An error is returned when the definition cannot be encoded.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn update(&self, definition: &PolicyDefinition, definition_id: &str) -> Result<()> {
        let payload = serde_json::to_string(definition)?;
        let _ = self
            .client
            .send(
                Method::PUT,
                &definition_api(&definition.kind, Some(definition_id)),
                Some(payload),
            )
            .await?;
        Ok(())
    }

    /// Retrieves a policy definition.
    ///
    /// An empty response body produces an empty [`Definition`].
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a JSON object.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn get(
        &self,
        definition_type: &DefinitionType,
        definition_id: &str,
    ) -> Result<Definition> {
        let response = self
            .client
            .get(&definition_api(definition_type, Some(definition_id)))
            .await?;
        into_definition(response.json)
    }

    /// Retrieves the definition types known by the controller.
    ///
    /// The hub-and-spoke listing is always available, and its header
    /// publishes all the definition types.
    ///
    /// # Errors
    ///
    /// A [`ErrorKind::Discovery`] error is returned when the listing header
    /// does not contain the definition types.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn definition_types(&self) -> Result<Vec<DefinitionType>> {
        let response = self
            .client
            .get(&definition_api(&DefinitionType::hub_and_spoke(), None))
            .await?;

        let definition_types = discover_definition_types(&response.json)?;
        debug!(
            "Discovered {} definition types from the `{HUB_AND_SPOKE}` listing: {:?}",
            definition_types.len(),
            definition_types
        );

        Ok(definition_types)
    }

    /// Retrieves the full policy definitions of a [`Category`].
    ///
    /// For [`Category::All`], the definition types are discovered first,
    /// then the definitions of each type are appended in discovery order.
    /// Definitions keep the order of their type listing, and definitions
    /// whose detail is empty are skipped.
    ///
    /// # Errors
    ///
    /// A [`ErrorKind::Discovery`] error is returned when the definition
    /// types cannot be discovered: in that case no further request is sent.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn resolve(&self, category: &Category) -> Result<Vec<Definition>> {
        match category {
            Category::Specific(definition_type) => self.resolve_type(definition_type).await,
            Category::All => {
                let mut definitions = Vec::new();
                for definition_type in self.definition_types().await? {
                    let type_definitions = self.resolve_type(&definition_type).await?;
                    definitions.extend(type_definitions);
                }
                Ok(definitions)
            }
        }
    }

    /// Retrieves the full policy definitions of a [`Category`] as a
    /// [`Dict`] keyed by the value of the `key_name` field.
    ///
    /// # Errors
    ///
    /// The same errors of [`Self::resolve`].
    pub async fn dict(
        &self,
        category: &Category,
        key_name: &str,
        remove_key: bool,
    ) -> Result<Dict<Definition>> {
        let definitions = self.resolve(category).await?;
        Ok(list_to_dict(definitions, key_name, remove_key))
    }

    async fn resolve_type(&self, definition_type: &DefinitionType) -> Result<Vec<Definition>> {
        let response = self
            .client
            .get(&definition_api(definition_type, None))
            .await?;
        let summaries = parse_list::<DefinitionSummary>(response)?;

        debug!(
            "Retrieving {} `{definition_type}` definitions",
            summaries.len()
        );

        let mut definitions = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let definition_id = summary.id().ok_or_else(|| {
                Error::new(
                    ErrorKind::MalformedResponse,
                    format!("A `{definition_type}` definition has no `definitionId`"),
                )
            })?;

            let definition = self.get(definition_type, definition_id).await?;
            if definition.is_empty() {
                warn!("Skip the `{definition_type}` definition `{definition_id}`: empty detail");
                continue;
            }

            definitions.push(definition);
        }

        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use vmanage::definition::{ActionKind, Category, DefinitionType, PolicyDefinition};

    use crate::error::ErrorKind;
    use crate::tests::{BASE_URL, MockTransport, client};
    use crate::transport::Method;

    use super::{DEFINITION_NAME, discover_definition_types};

    fn url(api: &str) -> String {
        format!("{BASE_URL}template/policy/definition/{api}")
    }

    fn listing(ids: &[&str]) -> Value {
        json!({
            "data": ids
                .iter()
                .map(|id| json!({ "definitionId": id }))
                .collect::<Vec<_>>()
        })
    }

    fn detail(id: &str, name: &str, kind: &str) -> Value {
        json!({ "definitionId": id, "name": name, "type": kind })
    }

    fn types_listing(types: &[&str], ids: &[&str]) -> Value {
        json!({
            "header": {
                "columns": [
                    { "title": "Name", "property": "name" },
                    {
                        "title": "Type",
                        "property": "type",
                        "keyvalue": types
                            .iter()
                            .map(|key| json!({ "key": key, "value": key }))
                            .collect::<Vec<_>>()
                    }
                ]
            },
            "data": listing(ids)["data"].clone()
        })
    }

    fn catalog() -> MockTransport {
        MockTransport::new()
            .get(url("hubandspoke"), types_listing(&["acl", "hubAndSpoke", "mesh"], &[]))
            .get(url("acl"), listing(&["d1"]))
            .get(url("acl/d1"), detail("d1", "block-telnet", "acl"))
            .get(url("mesh"), listing(&[]))
    }

    fn ids(definitions: &[vmanage::definition::Definition]) -> Vec<&str> {
        definitions.iter().filter_map(|d| d.id()).collect()
    }

    #[test]
    fn discovery_shape() {
        assert_eq!(
            discover_definition_types(&types_listing(&["ACL", "hubAndSpoke"], &[])),
            Ok(vec![
                DefinitionType::new("acl").unwrap(),
                DefinitionType::hub_and_spoke()
            ])
        );

        for listing in [
            json!({ "data": [] }),
            json!({ "header": { "columns": [] } }),
            json!({ "header": { "columns": [{}, { "title": "Type" }] } }),
            json!({ "header": { "columns": [{}, { "keyvalue": "acl" }] } }),
            json!({ "header": { "columns": [{}, { "keyvalue": [{ "value": "acl" }] }] } }),
            json!({ "header": { "columns": [{}, { "keyvalue": [{ "key": "" }] }] } }),
        ] {
            assert_eq!(
                discover_definition_types(&listing).unwrap_err().kind(),
                ErrorKind::Discovery,
                "{listing}"
            );
        }
    }

    #[tokio::test]
    async fn resolve_specific_type() {
        let transport = MockTransport::new()
            .get(url("hubandspoke"), listing(&["d2", "d3"]))
            .get(url("hubandspoke/d2"), detail("d2", "hub-1", "hubAndSpoke"))
            .get(url("hubandspoke/d3"), detail("d3", "hub-2", "hubAndSpoke"));
        let client = client(transport);

        let definitions = client
            .policy_definitions()
            .resolve(&"HubAndSpoke".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(ids(&definitions), ["d2", "d3"]);
        assert_eq!(
            client.transport().urls(),
            [
                url("hubandspoke"),
                url("hubandspoke/d2"),
                url("hubandspoke/d3")
            ]
        );
    }

    #[tokio::test]
    async fn skip_empty_details() {
        let transport = MockTransport::new()
            .get(url("acl"), listing(&["d1", "d2", "d3"]))
            .get(url("acl/d1"), detail("d1", "first", "acl"))
            .get(url("acl/d2"), json!({}))
            .get(url("acl/d3"), Value::Null);
        let client = client(transport);

        let definitions = client
            .policy_definitions()
            .resolve(&Category::specific("acl").unwrap())
            .await
            .unwrap();

        assert_eq!(ids(&definitions), ["d1"]);
        assert_eq!(client.transport().urls().len(), 4);
    }

    #[tokio::test]
    async fn resolve_all() {
        let transport = MockTransport::new()
            .get(url("hubandspoke"), types_listing(&["acl", "hubAndSpoke"], &["d2", "d3"]))
            .get(url("acl"), listing(&["d1"]))
            .get(url("acl/d1"), detail("d1", "block-telnet", "acl"))
            .get(url("hubandspoke/d2"), detail("d2", "hub-1", "hubAndSpoke"))
            .get(url("hubandspoke/d3"), detail("d3", "hub-2", "hubAndSpoke"));
        let client = client(transport);

        let definitions = client
            .policy_definitions()
            .resolve(&Category::All)
            .await
            .unwrap();

        assert_eq!(ids(&definitions), ["d1", "d2", "d3"]);
        // The hub-and-spoke listing is requested again for its summaries.
        assert_eq!(
            client.transport().urls(),
            [
                url("hubandspoke"),
                url("acl"),
                url("acl/d1"),
                url("hubandspoke"),
                url("hubandspoke/d2"),
                url("hubandspoke/d3"),
            ]
        );
    }

    #[tokio::test]
    async fn resolve_all_is_concatenation_of_types() {
        let client = client(catalog());
        let definitions = client.policy_definitions();

        let all = definitions.resolve(&Category::All).await.unwrap();

        let mut concatenation = Vec::new();
        for definition_type in definitions.definition_types().await.unwrap() {
            concatenation.extend(
                definitions
                    .resolve(&Category::Specific(definition_type))
                    .await
                    .unwrap(),
            );
        }

        assert_eq!(all, concatenation);
        assert_eq!(ids(&all), ["d1"]);
    }

    #[tokio::test]
    async fn malformed_discovery_stops_requests() {
        let transport = MockTransport::new()
            .get(url("hubandspoke"), json!({ "data": [] }))
            .get(url("acl"), listing(&["d1"]));
        let client = client(transport);

        let error = client
            .policy_definitions()
            .resolve(&Category::All)
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Discovery);
        assert_eq!(client.transport().urls(), [url("hubandspoke")]);
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let transport = MockTransport::new()
            .get(url("acl"), listing(&["d1", "d2"]))
            .get(url("acl/d1"), detail("d1", "first", "acl"));
        let client = client(transport);

        let error = client
            .policy_definitions()
            .resolve(&Category::specific("acl").unwrap())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Status);
        assert_eq!(client.transport().urls().len(), 3);
    }

    #[tokio::test]
    async fn summary_without_identifier() {
        let transport = MockTransport::new().get(url("acl"), json!({ "data": [{ "name": "x" }] }));
        let client = client(transport);

        let error = client
            .policy_definitions()
            .resolve(&Category::specific("acl").unwrap())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn definitions_dict() {
        let client = client(catalog());

        let dict = client
            .policy_definitions()
            .dict(&Category::All, DEFINITION_NAME, true)
            .await
            .unwrap();

        assert_eq!(dict.len(), 1);
        assert_eq!(dict["block-telnet"].id(), Some("d1"));
        assert_eq!(dict["block-telnet"].name(), None);
    }

    #[tokio::test]
    async fn get_definition() {
        let transport = MockTransport::new()
            .get(url("acl/d1"), detail("d1", "first", "acl"))
            .get(url("acl/d2"), Value::Null)
            .get(url("acl/d3"), json!([1]));
        let client = client(transport);
        let definitions = client.policy_definitions();
        let acl = DefinitionType::new("ACL").unwrap();

        let definition = definitions.get(&acl, "d1").await.unwrap();
        assert_eq!(definition.kind(), Some(acl.clone()));

        assert!(definitions.get(&acl, "d2").await.unwrap().is_empty());

        assert_eq!(
            definitions.get(&acl, "d3").await.unwrap_err().kind(),
            ErrorKind::MalformedResponse
        );
    }

    #[tokio::test]
    async fn crud_requests() {
        let payload = PolicyDefinition::new("block-telnet", DefinitionType::new("Acl").unwrap())
            .description("Drop telnet")
            .default_action(ActionKind::Drop);

        let transport = MockTransport::new()
            .reply(Method::POST, url("acl"), json!({ "definitionId": "d9" }))
            .reply(Method::PUT, url("acl/d9"), json!({ "masterTemplatesAffected": [] }))
            .reply(Method::DELETE, url("acl/d9"), Value::Null);
        let client = client(transport);
        let definitions = client.policy_definitions();

        definitions.add(&payload).await.unwrap();
        definitions.update(&payload, "d9").await.unwrap();
        definitions
            .delete(&DefinitionType::new("ACL").unwrap(), "d9")
            .await
            .unwrap();

        let recorded = client.transport().recorded();
        assert_eq!(recorded.len(), 3);

        let expected_payload = json!({
            "name": "block-telnet",
            "type": "acl",
            "description": "Drop telnet",
            "defaultAction": { "type": "drop" },
        });

        assert_eq!(recorded[0].method, Method::POST);
        assert_eq!(recorded[0].url, url("acl"));
        assert_eq!(recorded[0].json_payload(), Some(expected_payload.clone()));

        assert_eq!(recorded[1].method, Method::PUT);
        assert_eq!(recorded[1].url, url("acl/d9"));
        assert_eq!(recorded[1].json_payload(), Some(expected_payload));

        assert_eq!(recorded[2].method, Method::DELETE);
        assert_eq!(recorded[2].url, url("acl/d9"));
        assert_eq!(recorded[2].payload, None);
    }
}
