//! The `vmanage-client` library crate provides a set of APIs for managing
//! the devices and the policy definitions of a vManage controller through
//! its `dataservice` REST API.
//!
//! Core functionalities of this crate include:
//!
//! - Retrieving the policy definitions of a type, or of all the types
//!   published by a controller, along with their full content
//! - Creating, updating, and deleting policy definitions
//! - Querying the device inventory, the status and the configuration
//!   of single devices, and the data they produce
//! - Converting lists of records into ordered mappings keyed by a field
//!
//! Requests are sent through a [`Transport`](transport::Transport). The
//! default one is built on `reqwest`, while authentication is left to the
//! underlying HTTP client. All requests are sent sequentially: each request
//! completes before the next one starts.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// A client for the `dataservice` API of a controller.
pub mod client;
/// Conversion of record lists into ordered mappings.
pub mod collection;
/// Policy definitions retrieval and management.
pub mod definitions;
/// Device inventory queries.
pub mod device;
/// Error management.
pub mod error;
/// Extraction of the payload of controller responses.
pub mod response;
/// The transport used to send requests to a controller.
pub mod transport;
