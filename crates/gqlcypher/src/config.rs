use serde::Deserialize;

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Allow `_MATCHES` regular expression filters
    pub enable_regex: bool,

    /// Dotted path of the role list inside the claims
    pub roles_path: String,

    /// Reject every unauthenticated request
    pub global_authentication: bool,

    /// Limits applied to top-level reads
    pub limit: Option<QueryLimit>,
}

/// Default and maximum number of root nodes a read returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryLimit {
    /// Used when the request gives no limit
    pub default: Option<i64>,

    /// Requested limits above this are lowered to it
    pub max: Option<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_regex: false,
            roles_path: "roles".to_string(),
            global_authentication: false,
            limit: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_regex(mut self, enable: bool) -> Self {
        self.enable_regex = enable;
        self
    }

    pub fn roles_path(mut self, path: impl Into<String>) -> Self {
        self.roles_path = path.into();
        self
    }

    pub fn global_authentication(mut self, enable: bool) -> Self {
        self.global_authentication = enable;
        self
    }

    pub fn limit(mut self, limit: QueryLimit) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl QueryLimit {
    /// The limit to apply given the one the request asked for.
    pub fn apply(&self, requested: Option<i64>) -> Option<i64> {
        match (requested.or(self.default), self.max) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (None, Some(max)) => Some(max),
            (limit, None) => limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(!config.enable_regex);
        assert_eq!(config.roles_path, "roles");
        assert_eq!(config.limit, None);
    }

    #[test]
    fn load_from_json() {
        let config: Config = serde_json::from_str(
            r#"{ "enableRegex": true, "limit": { "default": 20, "max": 100 } }"#,
        )
        .unwrap();

        assert!(config.enable_regex);
        assert_eq!(config.roles_path, "roles");
        assert_eq!(
            config.limit,
            Some(QueryLimit {
                default: Some(20),
                max: Some(100)
            })
        );
    }

    #[test]
    fn limit_is_clamped() {
        let limit = QueryLimit {
            default: Some(10),
            max: Some(50),
        };

        assert_eq!(limit.apply(None), Some(10));
        assert_eq!(limit.apply(Some(20)), Some(20));
        assert_eq!(limit.apply(Some(500)), Some(50));
        assert_eq!(QueryLimit::default().apply(None), None);
    }
}
