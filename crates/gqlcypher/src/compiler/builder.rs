use super::Compiler;
use crate::{Config, QueryLimit};

use gqlcypher_core::{bail, Error, Result, Schema};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    schema: Option<Arc<Schema>>,

    config: Config,
}

impl Builder {
    /// Set the schema requests are compiled against
    pub fn schema(&mut self, schema: impl Into<Arc<Schema>>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    /// Replace the whole configuration, e.g. one loaded from JSON
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn enable_regex(&mut self, enable: bool) -> &mut Self {
        self.config.enable_regex = enable;
        self
    }

    pub fn roles_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.config.roles_path = path.into();
        self
    }

    pub fn global_authentication(&mut self, enable: bool) -> &mut Self {
        self.config.global_authentication = enable;
        self
    }

    pub fn limit(&mut self, limit: QueryLimit) -> &mut Self {
        self.config.limit = Some(limit);
        self
    }

    pub fn build(&mut self) -> Result<Compiler> {
        let Some(schema) = self.schema.clone() else {
            return Err(Error::invalid_schema("no schema was given to the compiler"));
        };

        if self.config.roles_path.is_empty() {
            bail!("`roles_path` must not be empty");
        }

        if let Some(limit) = &self.config.limit {
            for (name, value) in [("default", limit.default), ("max", limit.max)] {
                if value.is_some_and(|value| value <= 0) {
                    bail!("the {name} limit must be positive");
                }
            }
        }

        Ok(Compiler {
            schema,
            config: self.config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlcypher_core::schema::{Entity, Field, Scalar};

    fn schema() -> Schema {
        Schema::builder()
            .entity(Entity::new("Movie").field(Field::primitive("title", Scalar::String)))
            .build()
            .unwrap()
    }

    #[test]
    fn schema_is_required() {
        let err = Compiler::builder().build().unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn settings_reach_the_config() {
        let compiler = Compiler::builder()
            .schema(schema())
            .enable_regex(true)
            .roles_path("org.roles")
            .build()
            .unwrap();

        assert!(compiler.config().enable_regex);
        assert_eq!(compiler.config().roles_path, "org.roles");
        assert!(compiler.schema().entity("Movie").is_some());
    }

    #[test]
    fn limits_must_be_positive() {
        let err = Compiler::builder()
            .schema(schema())
            .limit(QueryLimit {
                default: Some(0),
                max: None,
            })
            .build()
            .unwrap_err();

        assert_eq!(err.to_string(), "the default limit must be positive");
    }
}
