//! Schema definitions and validation for SCIM resources.
//!
//! This module provides the attribute schema and the validation engine:
//! declarative attribute definitions, the standard schemas built from
//! them, and the walk of a schema tree against raw input.
//!
//! # Key Types
//!
//! - [`Attribute`] - individual attribute definition and constraints
//! - [`BaseSchema`] - a schema URN composed of attribute definitions
//! - [`SchemaRegistry`] - immutable registry of the standard schemas
//!
//! # Examples
//!
//! ```rust
//! use scim_data::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), scim_data::ScimError> {
//! let registry = SchemaRegistry::new()?;
//! let (user, issues) = registry
//!     .get_user_schema()
//!     .validate(&json!({"userName": "babs"}));
//! assert!(user.contains_key("userName"));
//! assert!(issues.has_issues()); // "schemas" is required
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod base;
pub mod core;
pub mod registry;
pub mod types;
pub mod validators;

#[cfg(test)]
mod tests;

// Re-export the main types for convenience
pub use attribute::{Attribute, AttributeBuilder, Attrs, ValueParser};
pub use base::{BaseSchema, SchemaExtension};
pub use registry::SchemaRegistry;
pub use types::{AttributeIssuer, AttributeType, Mutability, Returned, Uniqueness};
pub use validators::{AbsoluteUrl, SinglePrimaryValue, ValueValidator};
