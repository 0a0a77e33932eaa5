use super::Field;

/// An abstract type whose implementations share a set of fields.
#[derive(Debug, Clone)]
pub struct Interface {
    pub name: String,

    /// Fields every implementation declares
    pub fields: Vec<Field>,

    /// Implementing entities in declaration order. Filled in when the
    /// schema is built.
    pub implementations: Vec<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Interface {
        Interface {
            name: name.into(),
            fields: vec![],
            implementations: vec![],
        }
    }

    pub fn field(mut self, field: Field) -> Interface {
        self.fields.push(field);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}
