use gqlcypher_core::stmt::Value;

use indexmap::IndexMap;

/// A field of the request with its arguments and nested selection.
///
/// Fragments are already resolved: `fields_by_type` maps a type name to the
/// fields selected when the value is of that type. For an interface field the
/// interface's own name carries the fields common to every implementation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveTree {
    pub name: String,
    pub alias: Option<String>,
    pub args: IndexMap<String, Value>,
    pub fields_by_type: IndexMap<String, IndexMap<String, ResolveTree>>,
}

impl ResolveTree {
    pub fn new(name: impl Into<String>) -> ResolveTree {
        ResolveTree {
            name: name.into(),
            ..ResolveTree::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> ResolveTree {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> ResolveTree {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Adds `field` to the selection made on `type_name`.
    pub fn field(mut self, type_name: impl Into<String>, field: ResolveTree) -> ResolveTree {
        self.fields_by_type
            .entry(type_name.into())
            .or_default()
            .insert(field.response_key().to_string(), field);
        self
    }

    /// The key the field's value is returned under.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// An argument, treating explicit `null` as absent.
    pub fn get_arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|value| !value.is_null())
    }

    /// Fields selected for a value of any of `types`, merged in order. A
    /// later type's selection of the same key wins.
    pub fn fields_for<'a>(&'a self, types: &[&str]) -> IndexMap<&'a str, &'a ResolveTree> {
        let mut fields = IndexMap::new();
        for type_name in types {
            if let Some(selection) = self.fields_by_type.get(*type_name) {
                for (key, field) in selection {
                    fields.insert(key.as_str(), field);
                }
            }
        }
        fields
    }

    /// Every selected field regardless of type.
    pub fn all_fields(&self) -> impl Iterator<Item = &ResolveTree> {
        self.fields_by_type.values().flat_map(IndexMap::values)
    }

    /// The first selected field named `name` on any type.
    pub fn find(&self, name: &str) -> Option<&ResolveTree> {
        self.all_fields().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_type_selection_wins() {
        let tree = ResolveTree::new("actedIn")
            .field("Production", ResolveTree::new("title"))
            .field("Movie", ResolveTree::new("runtime"))
            .field("Movie", ResolveTree::new("title").alias("title"));

        let fields = tree.fields_for(&["Production", "Movie"]);
        assert_eq!(fields.keys().copied().collect::<Vec<_>>(), ["title", "runtime"]);
        assert!(tree.fields_for(&["Series"]).is_empty());
    }

    #[test]
    fn null_args_are_absent() {
        let tree = ResolveTree::new("posts").arg("where", Value::Null);
        assert!(tree.get_arg("where").is_none());
    }
}
