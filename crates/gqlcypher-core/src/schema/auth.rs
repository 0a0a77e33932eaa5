use crate::{stmt::Value, Error, Result};

/// An authorization rule attached to an entity or a field.
///
/// Rules of the same kind that apply to an operation are combined with
/// AND: every applicable rule must hold.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRule {
    pub kind: RuleKind,

    /// Operations the rule applies to; empty means every operation
    pub operations: Vec<Operation>,

    /// Reject unauthenticated requests outright
    pub require_authentication: bool,

    pub condition: RuleCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Silently narrows the set of matched nodes
    Filter,

    /// Aborts the request when the condition does not hold
    Validate(When),

    /// Aborts the request when the condition does not hold; checked after
    /// the write for creates and updates and before it otherwise
    Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Aggregate,
    Create,
    Update,
    Delete,
    Connect,
    Disconnect,
    Subscribe,
}

/// The condition of a rule.
///
/// `node` is a filter over the guarded node in the same shape as a request
/// `where` argument; string values of the form `$jwt.<path>` and
/// `$context.<path>` refer to the request context. `jwt` is a filter over
/// the claims themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleCondition {
    pub node: Option<Value>,
    pub jwt: Option<Value>,

    /// The claims' role list must contain at least one of these
    pub roles: Vec<String>,

    pub and: Vec<RuleCondition>,
    pub or: Vec<RuleCondition>,
    pub not: Option<Box<RuleCondition>>,
}

impl AuthorizationRule {
    fn new(kind: RuleKind, condition: RuleCondition) -> AuthorizationRule {
        AuthorizationRule {
            kind,
            operations: vec![],
            require_authentication: false,
            condition,
        }
    }

    pub fn filter(condition: RuleCondition) -> AuthorizationRule {
        AuthorizationRule::new(RuleKind::Filter, condition)
    }

    pub fn validate(when: When, condition: RuleCondition) -> AuthorizationRule {
        AuthorizationRule::new(RuleKind::Validate(when), condition)
    }

    pub fn allow(condition: RuleCondition) -> AuthorizationRule {
        AuthorizationRule::new(RuleKind::Allow, condition)
    }

    /// A rule that only requires the request to be authenticated.
    pub fn authenticated() -> AuthorizationRule {
        AuthorizationRule::new(RuleKind::Validate(When::Before), RuleCondition::default())
            .require_authentication()
    }

    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> AuthorizationRule {
        self.operations = operations.into_iter().collect();
        self
    }

    pub fn require_authentication(mut self) -> AuthorizationRule {
        self.require_authentication = true;
        self
    }

    pub fn applies_to(&self, operation: Operation) -> bool {
        self.operations.is_empty() || self.operations.contains(&operation)
    }

    /// Checks the rule is well formed. `owner` names the entity or field it
    /// is attached to.
    pub fn verify(&self, owner: &str) -> Result<()> {
        if self.kind == RuleKind::Filter {
            if !self.condition.has_where() {
                return Err(Error::invalid_rule(
                    owner,
                    "a filter rule requires a `node` or `jwt` where condition",
                ));
            }

            if self.operations.contains(&Operation::Create) {
                return Err(Error::invalid_rule(
                    owner,
                    "filter rules cannot apply to create",
                ));
            }
        }

        if self.condition.is_empty() && !self.require_authentication {
            return Err(Error::invalid_rule(owner, "rule has no condition"));
        }

        self.condition.verify(owner)
    }
}

impl RuleCondition {
    pub fn node(filter: impl Into<Value>) -> RuleCondition {
        RuleCondition {
            node: Some(filter.into()),
            ..RuleCondition::default()
        }
    }

    pub fn jwt(filter: impl Into<Value>) -> RuleCondition {
        RuleCondition {
            jwt: Some(filter.into()),
            ..RuleCondition::default()
        }
    }

    pub fn roles<I, S>(roles: I) -> RuleCondition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleCondition {
            roles: roles.into_iter().map(Into::into).collect(),
            ..RuleCondition::default()
        }
    }

    pub fn all(conditions: impl IntoIterator<Item = RuleCondition>) -> RuleCondition {
        RuleCondition {
            and: conditions.into_iter().collect(),
            ..RuleCondition::default()
        }
    }

    pub fn any(conditions: impl IntoIterator<Item = RuleCondition>) -> RuleCondition {
        RuleCondition {
            or: conditions.into_iter().collect(),
            ..RuleCondition::default()
        }
    }

    pub fn negate(condition: RuleCondition) -> RuleCondition {
        RuleCondition {
            not: Some(Box::new(condition)),
            ..RuleCondition::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
            && self.jwt.is_none()
            && self.roles.is_empty()
            && self.and.iter().all(RuleCondition::is_empty)
            && self.or.iter().all(RuleCondition::is_empty)
            && self.not.as_deref().map_or(true, RuleCondition::is_empty)
    }

    /// True if a `node` or `jwt` filter appears anywhere in the condition.
    pub fn has_where(&self) -> bool {
        self.node.is_some()
            || self.jwt.is_some()
            || self.and.iter().any(RuleCondition::has_where)
            || self.or.iter().any(RuleCondition::has_where)
            || self.not.as_deref().is_some_and(RuleCondition::has_where)
    }

    /// True if evaluating the condition needs the guarded node bound.
    pub fn references_node(&self) -> bool {
        self.node.is_some()
            || self.and.iter().any(RuleCondition::references_node)
            || self.or.iter().any(RuleCondition::references_node)
            || self.not.as_deref().is_some_and(RuleCondition::references_node)
    }

    fn verify(&self, owner: &str) -> Result<()> {
        for (name, filter) in [("node", &self.node), ("jwt", &self.jwt)] {
            if let Some(filter) = filter {
                if !filter.is_map() {
                    return Err(Error::invalid_rule(
                        owner,
                        format!("`{name}` condition must be a map, got {}", filter.type_name()),
                    ));
                }
            }
        }

        for condition in self.and.iter().chain(&self.or).chain(self.not.as_deref()) {
            condition.verify(owner)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_without_where_is_rejected() {
        let rule = AuthorizationRule::filter(RuleCondition::roles(["admin"]));
        let err = rule.verify("Post").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid authorization rule on `Post`: a filter rule requires a `node` or `jwt` where condition"
        );
    }

    #[test]
    fn empty_rule_is_rejected_unless_it_requires_authentication() {
        let rule = AuthorizationRule::validate(When::Before, RuleCondition::default());
        assert!(rule.verify("Post").unwrap_err().is_invalid_rule());

        assert!(AuthorizationRule::authenticated().verify("Post").is_ok());
    }

    #[test]
    fn node_condition_must_be_a_map() {
        let rule = AuthorizationRule::allow(RuleCondition::node(json!("$jwt.sub")));
        assert!(rule.verify("Post.content").is_err());
    }

    #[test]
    fn applies_to_every_operation_by_default() {
        let rule = AuthorizationRule::allow(RuleCondition::roles(["admin"]));
        assert!(rule.applies_to(Operation::Delete));

        let rule = rule.operations([Operation::Connect]);
        assert!(rule.applies_to(Operation::Connect));
        assert!(!rule.applies_to(Operation::Delete));
    }

    #[test]
    fn references_node_looks_through_combinators() {
        let condition = RuleCondition::any([
            RuleCondition::roles(["admin"]),
            RuleCondition::negate(RuleCondition::node(json!({ "locked": true }))),
        ]);
        assert!(condition.references_node());
        assert!(!RuleCondition::roles(["admin"]).references_node());
    }
}
