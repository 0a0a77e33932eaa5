use gqlcypher_core::schema::{Entity, Field, Interface, RelationshipProperties};

/// What a `where` map or selection is evaluated against.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Subject<'a> {
    Entity(&'a Entity),
    Interface(&'a Interface),

    /// Properties stored on a relationship
    Edge(&'a RelationshipProperties),
}

impl<'a> Subject<'a> {
    pub(crate) fn name(self) -> &'a str {
        match self {
            Subject::Entity(entity) => &entity.name,
            Subject::Interface(interface) => &interface.name,
            Subject::Edge(properties) => &properties.name,
        }
    }

    pub(crate) fn fields(self) -> &'a [Field] {
        match self {
            Subject::Entity(entity) => &entity.fields,
            Subject::Interface(interface) => &interface.fields,
            Subject::Edge(properties) => &properties.fields,
        }
    }

    pub(crate) fn find_field(self, name: &str) -> Option<&'a Field> {
        self.fields().iter().find(|field| field.name == name)
    }

    pub(crate) fn entity(self) -> Option<&'a Entity> {
        match self {
            Subject::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}
