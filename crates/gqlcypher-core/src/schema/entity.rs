use super::{global_id, AuthorizationRule, Field};
use crate::{context::ContextRef, stmt::Value, Context, Error, Result};

use heck::ToLowerCamelCase;

/// A node type of the graph.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Type name as exposed to clients
    pub name: String,

    /// Labels matched and written for this entity. Defaults to the name.
    pub labels: Vec<Label>,

    /// Plural form used for root field names
    pub plural: String,

    pub fields: Vec<Field>,

    /// Interfaces the entity implements
    pub interfaces: Vec<String>,

    /// Entity-level authorization rules
    pub rules: Vec<AuthorizationRule>,

    /// Field whose value backs the entity's global `id`, if any
    pub global_id: Option<String>,
}

/// A node label, either literal or resolved per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Static(String),

    /// `$jwt.<path>` or `$context.<path>`
    Template(String),
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Entity {
        let name = name.into();
        let plural = pluralizer::pluralize(&name, 2, false);

        Entity {
            labels: vec![Label::Static(name.clone())],
            plural,
            name,
            fields: vec![],
            interfaces: vec![],
            rules: vec![],
            global_id: None,
        }
    }

    /// Replaces the default label set.
    pub fn labels<I, S>(mut self, labels: I) -> Entity
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(|label| Label::parse(label.into())).collect();
        self
    }

    pub fn plural(mut self, plural: impl Into<String>) -> Entity {
        self.plural = plural.into();
        self
    }

    pub fn field(mut self, field: Field) -> Entity {
        self.fields.push(field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Entity {
        self.interfaces.push(interface.into());
        self
    }

    pub fn rule(mut self, rule: AuthorizationRule) -> Entity {
        self.rules.push(rule);
        self
    }

    pub fn global_id(mut self, field: impl Into<String>) -> Entity {
        self.global_id = Some(field.into());
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn expect_field(&self, name: &str) -> Result<&Field> {
        self.find_field(name).ok_or_else(|| {
            Error::invalid_request(format!("unknown field `{name}` on `{}`", self.name))
        })
    }

    pub fn relationship_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.is_relationship())
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.unique)
    }

    /// Name of the root query field, e.g. `posts`.
    pub fn root_field(&self) -> String {
        self.plural.to_lower_camel_case()
    }

    /// Resolves the label set, substituting templates from `cx`.
    pub fn resolve_labels(&self, cx: &Context) -> Result<Vec<String>> {
        self.labels
            .iter()
            .map(|label| match label {
                Label::Static(label) => Ok(label.clone()),
                Label::Template(template) => {
                    let value = ContextRef::parse(template).and_then(|r| cx.resolve(r));
                    match value {
                        Some(Value::String(label)) => Ok(label.clone()),
                        _ => Err(Error::invalid_request(format!(
                            "label `{template}` of `{}` could not be resolved",
                            self.name
                        ))),
                    }
                }
            })
            .collect()
    }

    /// Whether `id` is the client-facing global identifier rather than a
    /// declared field.
    pub fn is_global_id_key(&self, key: &str) -> bool {
        key == "id" && self.global_id.is_some() && self.find_field("id").is_none()
    }

    /// Encodes a value of the global id field into an opaque identifier.
    pub fn to_global_id(&self, value: &Value) -> Option<String> {
        let field = self.global_id.as_deref()?;
        Some(global_id::encode(&self.name, field, value))
    }

    /// Decodes an opaque identifier issued for this entity into the field
    /// name and value it was built from.
    pub fn from_global_id(&self, id: &str) -> Result<(&Field, Value)> {
        let Some(field_name) = self.global_id.as_deref() else {
            return Err(Error::invalid_request(format!(
                "`{}` has no global id",
                self.name
            )));
        };

        let decoded = global_id::decode(id)?;
        if decoded.entity != self.name || decoded.field != field_name {
            return Err(Error::invalid_request(format!(
                "global id `{id}` does not identify a `{}`",
                self.name
            )));
        }

        let field = self.expect_field(field_name)?;
        let value = field.parse_global_id_value(decoded.value);
        Ok((field, value))
    }
}

impl Label {
    pub fn parse(label: String) -> Label {
        if ContextRef::parse(&label).is_some() {
            Label::Template(label)
        } else {
            Label::Static(label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Scalar;
    use serde_json::json;

    #[test]
    fn plural_and_root_field() {
        let post = Entity::new("Post");
        assert_eq!(post.plural, "Posts");
        assert_eq!(post.root_field(), "posts");

        let movie = Entity::new("super_movie");
        assert_eq!(movie.root_field(), "superMovies");
    }

    #[test]
    fn labels_resolve_templates() {
        let entity = Entity::new("Film").labels(["Movie", "$jwt.tenant", "$context.region"]);
        let cx = Context::authenticated(json!({ "tenant": "Acme" })).with_value("region", "EU");

        assert_eq!(
            entity.resolve_labels(&cx).unwrap(),
            ["Movie", "Acme", "EU"]
        );
    }

    #[test]
    fn missing_template_value_is_an_error() {
        let entity = Entity::new("Film").labels(["$jwt.tenant"]);
        let err = entity.resolve_labels(&Context::anonymous()).unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[test]
    fn global_id_round_trip() {
        let entity = Entity::new("Actor")
            .field(crate::schema::Field::primitive("dbId", Scalar::Int))
            .global_id("dbId");

        let id = entity.to_global_id(&Value::Int(42)).unwrap();
        let (field, value) = entity.from_global_id(&id).unwrap();
        assert_eq!(field.name, "dbId");
        assert_eq!(value, Value::Int(42));
        assert!(entity.is_global_id_key("id"));
    }
}
