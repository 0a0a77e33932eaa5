use super::Rules;
use crate::translate::{filter::ScalarOp, input, Subject, Translator};

use gqlcypher_core::{
    context::ContextRef,
    schema::{AuthorizationRule, Entity, Operation, RuleCondition},
    stmt::{Expr, Value, Variable},
    Error, Result,
};

impl<'a> Translator<'a> {
    /// The entity's filter rules for `operations`, as a predicate over
    /// `var`.
    ///
    /// Relationship filters inside a rule do not apply the related entity's
    /// own rules, so this returns `None` while a rule is being lowered.
    pub(crate) fn rule_filter(
        &mut self,
        var: &Variable,
        entity: &'a Entity,
        operations: &[Operation],
    ) -> Result<Option<Expr>> {
        if self.lowering_rules > 0 {
            return Ok(None);
        }

        let rules = Rules::entity(entity, operations);
        self.lower_rules(var, entity, &rules.filter)
    }

    /// ANDs the predicates of `rules`, evaluated against `var`.
    pub(crate) fn lower_rules(
        &mut self,
        var: &Variable,
        entity: &'a Entity,
        rules: &[&AuthorizationRule],
    ) -> Result<Option<Expr>> {
        let mut predicates = vec![];
        for rule in rules {
            predicates.push(self.lower_rule(var, entity, rule)?);
        }
        Ok(Expr::and_all(predicates))
    }

    fn lower_rule(
        &mut self,
        var: &Variable,
        entity: &'a Entity,
        rule: &AuthorizationRule,
    ) -> Result<Option<Expr>> {
        tracing::trace!(entity = %entity.name, kind = ?rule.kind, %var, "lowering authorization rule");

        self.lowering_rules += 1;
        let condition = self.lower_condition(var, entity, &rule.condition, false);
        self.lowering_rules -= 1;

        let authenticated = rule.require_authentication.then(|| self.is_authenticated());
        Ok(Expr::and_all([authenticated, condition?]))
    }

    /// `negated` is set under an odd number of `not` conditions.
    fn lower_condition(
        &mut self,
        var: &Variable,
        entity: &'a Entity,
        condition: &RuleCondition,
        negated: bool,
    ) -> Result<Option<Expr>> {
        let mut parts = vec![];

        if let Some(node) = &condition.node {
            parts.push(match self.resolve_context(node) {
                Some(resolved) => self.filter(var, Subject::Entity(entity), &resolved)?,
                // A referenced claim is missing. The node filter becomes
                // whichever literal cannot make the enclosing rule pass.
                None => Some(Expr::from(negated)),
            });
        }

        if let Some(jwt) = &condition.jwt {
            parts.push(self.claims_filter(jwt)?);
        }

        if !condition.roles.is_empty() {
            parts.push(Some(self.roles_predicate(&condition.roles)));
        }

        if !condition.and.is_empty() {
            let mut nested = vec![];
            for condition in &condition.and {
                nested.push(self.lower_condition(var, entity, condition, negated)?);
            }
            parts.push(Expr::and_all(nested));
        }

        if !condition.or.is_empty() {
            let mut nested = vec![];
            for condition in &condition.or {
                nested.push(self.lower_condition(var, entity, condition, negated)?);
            }
            if nested.iter().all(Option::is_some) {
                parts.push(Expr::or_any(nested));
            }
        }

        if let Some(condition) = &condition.not {
            let predicate = match self.lower_condition(var, entity, condition, !negated)? {
                Some(predicate) => Expr::not(predicate),
                None => Expr::from(false),
            };
            parts.push(Some(predicate));
        }

        Ok(Expr::and_all(parts))
    }

    /// A filter over the claims themselves, evaluated against `$jwt`.
    fn claims_filter(&mut self, filter: &Value) -> Result<Option<Expr>> {
        let mut predicates = vec![];

        for (key, value) in input::expect_map("jwt", filter)? {
            let predicate = match key.as_str() {
                "AND" | "OR" => {
                    let mut nested = vec![];
                    for item in input::expect_list(key, value)? {
                        nested.push(self.claims_filter(item)?);
                    }
                    if key == "AND" {
                        Expr::and_all(nested)
                    } else if nested.iter().all(Option::is_some) {
                        Expr::or_any(nested)
                    } else {
                        None
                    }
                }
                "NOT" => self.claims_filter(value)?.map(Expr::not),
                _ => Some(self.claim_comparison(key, value)?),
            };
            predicates.push(predicate);
        }

        Ok(Expr::and_all(predicates))
    }

    fn claim_comparison(&mut self, key: &str, value: &Value) -> Result<Expr> {
        let (path, op) = ScalarOp::split(key);
        let claim = Expr::property_path(self.jwt(), path);

        if value.is_null() {
            return match op {
                ScalarOp::Eq => Ok(Expr::is_null(claim)),
                ScalarOp::Not => Ok(Expr::is_not_null(claim)),
                _ => Err(Error::invalid_request(format!("`{key}` does not accept null"))),
            };
        }

        if op == ScalarOp::Distance || (op == ScalarOp::Matches && !self.config.enable_regex) {
            return Err(Error::invalid_request(format!(
                "`{key}` is not supported in a claims filter"
            )));
        }

        let value = self.resolve_context(value).unwrap_or(Value::Null);
        let rhs = self.param(&format!("jwt_{path}"), value);
        Ok(op.apply(claim, rhs))
    }

    /// `any(role IN $jwt.<roles path> WHERE role IN $roles)`
    fn roles_predicate(&mut self, roles: &[String]) -> Expr {
        let claimed = Expr::func(
            "coalesce",
            [
                Expr::property_path(self.jwt(), &self.config.roles_path),
                Expr::list([]),
            ],
        );
        let required = self.param("roles", Value::from(roles.to_vec()));
        let role = self.env.variable("role");
        Expr::any(&role, claimed, Expr::in_list(&role, required))
    }

    /// Substitutes `$jwt.` and `$context.` references in a rule's `where`
    /// with values from the request. Returns `None` when a reference does
    /// not resolve to a non-null value.
    fn resolve_context(&self, value: &Value) -> Option<Value> {
        match value {
            Value::String(text) => match ContextRef::parse(text) {
                Some(reference) => self
                    .cx
                    .resolve(reference)
                    .filter(|resolved| !resolved.is_null())
                    .cloned(),
                None => Some(value.clone()),
            },
            Value::List(items) => items
                .iter()
                .map(|item| self.resolve_context(item))
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            Value::Map(entries) => entries
                .iter()
                .map(|(key, item)| Some((key.clone(), self.resolve_context(item)?)))
                .collect::<Option<_>>()
                .map(Value::Map),
            _ => Some(value.clone()),
        }
    }
}
