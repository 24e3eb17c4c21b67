//! The data model exchanged with the `dataservice` REST API of a vManage
//! controller.
//!
//! This crate provides:
//!
//! - Policy definition types and the category selector used to list them.
//!   A definition type is a lowercase identifier such as `hubandspoke` or
//!   `acl`, while a category either selects one type or all the types known
//!   by a controller.
//! - Records returned by a controller. Records are opaque field mappings:
//!   the controller decides their content, and only the fields an operation
//!   really needs are exposed through typed accessors.
//! - Typed payloads sent to a controller when creating or updating
//!   resources.
//!
//! All structures are serializable and deserializable, so they can be
//! encoded at the HTTP boundary by a client.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod macros;

/// Policy definitions, their types, and the category selector.
pub mod definition;
/// Device inventory records and requests.
pub mod device;

pub use macros::Fields;

#[cfg(test)]
pub(crate) fn serialize<T: serde::Serialize>(value: T) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}

#[cfg(test)]
pub(crate) fn deserialize<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}
