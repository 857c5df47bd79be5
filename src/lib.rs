//! SCIM 2.0 data model, attribute schema, and validation engine.
//!
//! Provides the declarative rules governing how structured identity
//! records are defined, validated, serialized, and addressed by path
//! expressions: attribute definitions with their type, mutability,
//! cardinality, uniqueness, and canonical-value policies; a generic
//! case-insensitive nested data container; and a validation pipeline with
//! partial-failure semantics.
//!
//! # Core Components
//!
//! - [`AttrRep`] - the dotted/bracketed attribute path mini-language
//! - [`ScimData`] / [`ScimValue`] - the nested key-addressable container
//! - [`schema::Attribute`] and [`schema::BaseSchema`] - the schema tree
//! - [`ValidationIssues`] - path-addressable validation problems
//!
//! # Quick Start
//!
//! ```rust
//! use scim_data::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), scim_data::ScimError> {
//! let registry = SchemaRegistry::new()?;
//! let payload = json!({
//!     "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
//!     "status": "404",
//!     "detail": "Resource not found",
//! });
//! let (parsed, issues) = registry.get_error_schema().validate(&payload);
//! assert!(issues.is_empty());
//! assert_eq!(parsed.get_path("status")?, scim_data::ScimValue::Int(404));
//! # Ok(())
//! # }
//! ```
//!
//! The engine is purely synchronous and stateless across invocations;
//! schema definitions are read-only after construction, so one registry
//! may serve any number of parallel validations.

pub mod container;
pub mod error;
pub mod issues;
pub mod path;
pub mod schema;

// Re-export commonly used types for convenience
pub use container::{ScimData, ScimValue};
pub use error::{ScimError, ValidationError};
pub use issues::{Location, Segment, ValidationIssues};
pub use path::AttrRep;
pub use schema::{
    Attribute, AttributeType, BaseSchema, Mutability, Returned, SchemaExtension, SchemaRegistry,
    Uniqueness,
};
