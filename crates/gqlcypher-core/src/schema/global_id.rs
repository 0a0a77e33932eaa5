//! Opaque identifiers of the form `base64("<Entity>:<field>:<value>")`.

use crate::{stmt::Value, Error, Result};

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// The parts of a decoded global identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalId {
    pub entity: String,
    pub field: String,
    pub value: String,
}

pub fn encode(entity: &str, field: &str, value: &Value) -> String {
    let value = match value {
        Value::String(value) => value.clone(),
        Value::Int(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Bool(value) => value.to_string(),
        other => serde_json::Value::from(other.clone()).to_string(),
    };

    STANDARD.encode(format!("{entity}:{field}:{value}"))
}

/// Decodes an identifier. Only the first two `:` separate parts, so values
/// may themselves contain colons.
pub fn decode(id: &str) -> Result<GlobalId> {
    let bytes = STANDARD.decode(id)?;
    let text = String::from_utf8(bytes)?;

    let mut parts = text.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(entity), Some(field), Some(value)) if !entity.is_empty() && !field.is_empty() => {
            Ok(GlobalId {
                entity: entity.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            })
        }
        _ => Err(Error::invalid_request(format!(
            "`{id}` is not a valid global id"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_may_contain_colons() {
        let id = encode("Movie", "url", &Value::from("https://example.com:8080"));
        let decoded = decode(&id).unwrap();

        assert_eq!(decoded.entity, "Movie");
        assert_eq!(decoded.field, "url");
        assert_eq!(decoded.value, "https://example.com:8080");
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode("not base64!").is_err());
        assert!(decode(&STANDARD.encode("no-separators")).unwrap_err().is_invalid_request());
    }
}
