use super::Field;

/// Fields stored on relationships of a given type.
#[derive(Debug, Clone)]
pub struct RelationshipProperties {
    pub name: String,
    pub fields: Vec<Field>,
}

impl RelationshipProperties {
    pub fn new(name: impl Into<String>) -> RelationshipProperties {
        RelationshipProperties {
            name: name.into(),
            fields: vec![],
        }
    }

    pub fn field(mut self, field: Field) -> RelationshipProperties {
        self.fields.push(field);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}
