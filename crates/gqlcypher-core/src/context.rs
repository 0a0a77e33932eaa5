use crate::stmt::Value;

use indexmap::IndexMap;

/// Request-scoped values available to authorization rules and label
/// templates.
///
/// Rules reference decoded token claims as `$jwt.<path>` and any other
/// request value as `$context.<path>`. A context without claims is
/// unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Decoded token claims, `None` when the request is unauthenticated
    jwt: Option<IndexMap<String, Value>>,

    /// Arbitrary request values
    values: IndexMap<String, Value>,
}

/// Where a `$jwt.` or `$context.` reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRef<'a> {
    /// `$jwt.<path>`
    Jwt(&'a str),

    /// `$context.<path>`
    Context(&'a str),
}

impl Context {
    pub fn anonymous() -> Context {
        Context::default()
    }

    /// A context carrying decoded claims. Non-map claims are treated as an
    /// empty claim set.
    pub fn authenticated(claims: impl Into<Value>) -> Context {
        let claims = match claims.into() {
            Value::Map(claims) => claims,
            _ => IndexMap::new(),
        };

        Context {
            jwt: Some(claims),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Context {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.jwt.is_some()
    }

    /// The claims as a map value; empty when unauthenticated.
    pub fn claims(&self) -> Value {
        Value::Map(self.jwt.clone().unwrap_or_default())
    }

    /// Looks up a claim by dotted path.
    pub fn claim(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.jwt.as_ref()?.get(segments.next()?)?;
        segments.try_fold(first, |value, segment| value.get(segment))
    }

    /// Looks up a request value by dotted path.
    pub fn value(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.values.get(segments.next()?)?;
        segments.try_fold(first, |value, segment| value.get(segment))
    }

    /// Resolves a parsed reference against this context.
    pub fn resolve(&self, reference: ContextRef<'_>) -> Option<&Value> {
        match reference {
            ContextRef::Jwt(path) => self.claim(path),
            ContextRef::Context(path) => self.value(path),
        }
    }

    /// The roles found at `roles_path` in the claims.
    pub fn roles(&self, roles_path: &str) -> Vec<&str> {
        match self.claim(roles_path) {
            Some(Value::List(roles)) => roles.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(role)) => vec![role],
            _ => vec![],
        }
    }
}

impl<'a> ContextRef<'a> {
    /// Parses `$jwt.<path>` or `$context.<path>`.
    pub fn parse(text: &'a str) -> Option<ContextRef<'a>> {
        if let Some(path) = text.strip_prefix("$jwt.") {
            (!path.is_empty()).then_some(ContextRef::Jwt(path))
        } else if let Some(path) = text.strip_prefix("$context.") {
            (!path.is_empty()).then_some(ContextRef::Context(path))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn anonymous_context_has_no_claims() {
        let cx = Context::anonymous();
        assert!(!cx.is_authenticated());
        assert_eq!(cx.claims(), Value::Map(IndexMap::new()));
        assert_eq!(cx.claim("sub"), None);
    }

    #[test]
    fn claims_are_reachable_by_path() {
        let cx = Context::authenticated(json!({
            "sub": "user-1",
            "org": { "roles": ["admin", "editor"] },
        }));

        assert_eq!(cx.claim("sub"), Some(&Value::from("user-1")));
        assert_eq!(cx.roles("org.roles"), ["admin", "editor"]);
        assert!(cx.roles("roles").is_empty());
    }

    #[test]
    fn parse_references() {
        assert_eq!(ContextRef::parse("$jwt.sub"), Some(ContextRef::Jwt("sub")));
        assert_eq!(
            ContextRef::parse("$context.tenant.id"),
            Some(ContextRef::Context("tenant.id"))
        );
        assert_eq!(ContextRef::parse("$jwt."), None);
        assert_eq!(ContextRef::parse("jwt.sub"), None);
    }

    #[test]
    fn resolve_context_value() {
        let cx = Context::anonymous().with_value("tenant", json!({ "id": "t1" }));
        assert_eq!(
            cx.resolve(ContextRef::Context("tenant.id")),
            Some(&Value::from("t1"))
        );
    }
}
