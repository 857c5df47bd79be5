//! Process-wide registry of schema definitions.
//!
//! The registry builds the standard schemas once at startup and is
//! immutable afterwards, so it is safe for unsynchronized concurrent
//! reads — validations of independent payloads may run fully in parallel
//! against one shared registry.

use indexmap::IndexMap;

use crate::error::ScimError;
use crate::schema::base::BaseSchema;
use crate::schema::core;

/// Registry holding the standard SCIM schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    error_schema: BaseSchema,
    user_schema: BaseSchema,
    group_schema: BaseSchema,
    schemas: IndexMap<String, BaseSchema>,
}

impl SchemaRegistry {
    /// Builds the registry with the Error, User (enterprise extension
    /// included), and Group schemas.
    pub fn new() -> Result<Self, ScimError> {
        let error_schema = core::error_schema()?;
        let user_schema = core::user_schema()?;
        let group_schema = core::group_schema()?;

        let mut schemas = IndexMap::new();
        for schema in [&error_schema, &user_schema, &group_schema] {
            log::debug!("registered schema '{}'", schema.schema());
            schemas.insert(schema.schema().to_lowercase(), schema.clone());
        }

        Ok(SchemaRegistry {
            error_schema,
            user_schema,
            group_schema,
            schemas,
        })
    }

    /// Case-insensitive lookup by schema URN.
    pub fn get_schema(&self, urn: &str) -> Option<&BaseSchema> {
        self.schemas.get(&urn.to_lowercase())
    }

    pub fn get_error_schema(&self) -> &BaseSchema {
        &self.error_schema
    }

    pub fn get_user_schema(&self) -> &BaseSchema {
        &self.user_schema
    }

    pub fn get_group_schema(&self) -> &BaseSchema {
        &self.group_schema
    }

    /// All registered schemas, in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &BaseSchema> {
        self.schemas.values()
    }
}
