use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::macros::record;

/// The literal selecting every definition type known by a controller.
pub const ALL_CATEGORY: &str = "all";

/// The hub-and-spoke definition type.
///
/// A controller always publishes this type, and the header of its listing
/// carries the names of all the other definition types.
pub const HUB_AND_SPOKE: &str = "hubandspoke";

/// The error returned when a definition type is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyDefinitionType;

impl std::fmt::Display for EmptyDefinitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        "A definition type cannot be empty".fmt(f)
    }
}

impl std::error::Error for EmptyDefinitionType {}

/// A policy definition type.
///
/// The identifier is always lowercase, so the same type can be written with
/// any casing, e.g. `hubAndSpoke` and `hubandspoke` are the same type.
/// Apart from the casing, the identifier is kept as given, whitespace
/// included. Unknown types are accepted: a controller returns no
/// definitions for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DefinitionType(String);

impl DefinitionType {
    /// Creates a [`DefinitionType`].
    ///
    /// # Errors
    ///
    /// An error is returned if the type is empty.
    pub fn new(name: impl AsRef<str>) -> Result<Self, EmptyDefinitionType> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(EmptyDefinitionType);
        }
        Ok(Self(name.to_lowercase()))
    }

    /// Returns the [`DefinitionType`] hub-and-spoke.
    #[must_use]
    #[inline]
    pub fn hub_and_spoke() -> Self {
        Self(HUB_AND_SPOKE.into())
    }

    /// Returns the type as a string slice.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DefinitionType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DefinitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for DefinitionType {
    type Err = EmptyDefinitionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DefinitionType {
    type Error = EmptyDefinitionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DefinitionType> for String {
    fn from(value: DefinitionType) -> Self {
        value.0
    }
}

/// A selector for the policy definitions to retrieve.
///
/// Only the exact literal [`ALL_CATEGORY`] parses as [`Category::All`].
/// Any other casing of it, e.g. `ALL`, is the definition type `all`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// All definition types known by a controller.
    All,
    /// A single definition type.
    Specific(DefinitionType),
}

impl Category {
    /// Creates a [`Category`] for a single definition type.
    ///
    /// # Errors
    ///
    /// An error is returned if the type is empty.
    pub fn specific(name: impl AsRef<str>) -> Result<Self, EmptyDefinitionType> {
        DefinitionType::new(name).map(Self::Specific)
    }
}

impl From<DefinitionType> for Category {
    fn from(definition_type: DefinitionType) -> Self {
        Self::Specific(definition_type)
    }
}

impl std::str::FromStr for Category {
    type Err = EmptyDefinitionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CATEGORY {
            Ok(Self::All)
        } else {
            Self::specific(s)
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => ALL_CATEGORY.fmt(f),
            Self::Specific(definition_type) => definition_type.fmt(f),
        }
    }
}

record! {
    /// A policy definition returned by a controller.
    ///
    /// A definition is a server-side rule object identified by a unique
    /// `definitionId` and tagged by a `type`. All the other fields depend on
    /// the definition type and are kept untouched.
    pub struct Definition;
}

impl Definition {
    /// Returns the definition identifier.
    #[must_use]
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.get_str("definitionId")
    }

    /// Returns the definition name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Returns the definition type, lowercased.
    #[must_use]
    pub fn kind(&self) -> Option<DefinitionType> {
        self.get_str("type")
            .and_then(|kind| DefinitionType::new(kind).ok())
    }
}

record! {
    /// An entry of a definition type listing.
    ///
    /// A summary only describes a definition: its full content is retrieved
    /// through its identifier.
    pub struct DefinitionSummary;
}

impl DefinitionSummary {
    /// Returns the identifier of the summarized definition.
    #[must_use]
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.get_str("definitionId")
    }
}

/// Actions applied when no sequence of a definition matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Accept the traffic.
    Accept,
    /// Drop the traffic.
    Drop,
}

/// The default action of a policy definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAction {
    /// Action kind.
    #[serde(rename = "type")]
    pub kind: ActionKind,
}

impl DefaultAction {
    /// Creates a [`DefaultAction`].
    #[must_use]
    pub const fn new(kind: ActionKind) -> Self {
        Self { kind }
    }
}

/// A policy definition to be created or updated on a controller.
///
/// The fields shared by every definition type are explicit, while the
/// fields of a specific type are kept in an additional map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinition {
    /// Definition name.
    pub name: String,
    /// Definition type.
    #[serde(rename = "type")]
    pub kind: DefinitionType,
    /// Definition description.
    #[serde(default)]
    pub description: Cow<'static, str>,
    /// Type-specific definition content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Value>,
    /// Ordered sequences of match and action rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequences: Option<Vec<Value>>,
    /// Default action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<DefaultAction>,
    /// Any further type-specific field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyDefinition {
    /// Creates a [`PolicyDefinition`] with a name and a type.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DefinitionType) -> Self {
        Self {
            name: name.into(),
            kind,
            description: Cow::Borrowed(""),
            definition: None,
            sequences: None,
            default_action: None,
            extra: Map::new(),
        }
    }

    /// Sets the definition description.
    #[must_use]
    #[inline]
    pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the type-specific definition content.
    #[must_use]
    #[inline]
    pub fn definition(mut self, definition: Value) -> Self {
        self.definition = Some(definition);
        self
    }

    /// Sets the definition sequences.
    #[must_use]
    #[inline]
    pub fn sequences(mut self, sequences: Vec<Value>) -> Self {
        self.sequences = Some(sequences);
        self
    }

    /// Sets the [`DefaultAction`].
    #[must_use]
    #[inline]
    pub fn default_action(mut self, kind: ActionKind) -> Self {
        self.default_action = Some(DefaultAction::new(kind));
        self
    }

    /// Adds a type-specific field.
    #[must_use]
    #[inline]
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        let _ = self.extra.insert(key.into(), value);
        self
    }
}
