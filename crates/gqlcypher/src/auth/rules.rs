use gqlcypher_core::schema::{AuthorizationRule, Entity, Field, Operation, RuleKind, When};

/// The rules that apply to one node for a set of operations, grouped by
/// where they are placed in the statement.
#[derive(Debug, Default)]
pub(crate) struct Rules<'r> {
    /// Narrow the matched nodes
    pub(crate) filter: Vec<&'r AuthorizationRule>,

    /// Asserted before the write
    pub(crate) before: Vec<&'r AuthorizationRule>,

    /// Asserted after the write
    pub(crate) after: Vec<&'r AuthorizationRule>,
}

impl<'r> Rules<'r> {
    pub(crate) fn gather(
        rules: impl IntoIterator<Item = &'r AuthorizationRule>,
        operations: &[Operation],
    ) -> Rules<'r> {
        let writes = operations
            .iter()
            .any(|op| matches!(op, Operation::Create | Operation::Update));

        let mut gathered = Rules::default();
        for rule in rules {
            if !operations.iter().any(|op| rule.applies_to(*op)) {
                continue;
            }

            let bucket = match rule.kind {
                RuleKind::Filter => &mut gathered.filter,
                RuleKind::Validate(When::Before) => &mut gathered.before,
                RuleKind::Validate(When::After) => &mut gathered.after,
                RuleKind::Allow if writes => &mut gathered.after,
                RuleKind::Allow => &mut gathered.before,
            };
            bucket.push(rule);
        }

        gathered
    }

    /// Entity-level rules.
    pub(crate) fn entity(entity: &'r Entity, operations: &[Operation]) -> Rules<'r> {
        Rules::gather(&entity.rules, operations)
    }

    /// Rules of the given fields, for fields present in the request.
    pub(crate) fn fields(
        fields: impl IntoIterator<Item = &'r Field>,
        operations: &[Operation],
    ) -> Rules<'r> {
        Rules::gather(fields.into_iter().flat_map(|field| &field.rules), operations)
    }

    pub(crate) fn extend(&mut self, other: Rules<'r>) {
        self.filter.extend(other.filter);
        self.before.extend(other.before);
        self.after.extend(other.after);
    }

    /// Every assertion regardless of placement, for operations that do not
    /// write.
    pub(crate) fn assertions(&self) -> Vec<&'r AuthorizationRule> {
        self.before.iter().chain(&self.after).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlcypher_core::schema::RuleCondition;

    #[test]
    fn allow_is_checked_after_creates_and_before_deletes() {
        let rules = vec![AuthorizationRule::allow(RuleCondition::roles(["admin"]))];

        let create = Rules::gather(&rules, &[Operation::Create]);
        assert_eq!(create.after.len(), 1);
        assert!(create.before.is_empty());

        let delete = Rules::gather(&rules, &[Operation::Delete]);
        assert_eq!(delete.before.len(), 1);
        assert!(delete.after.is_empty());
    }

    #[test]
    fn rules_for_other_operations_are_skipped() {
        let rules = vec![
            AuthorizationRule::filter(RuleCondition::jwt(serde_json::json!({ "sub": "a" })))
                .operations([Operation::Read]),
            AuthorizationRule::validate(When::After, RuleCondition::roles(["admin"]))
                .operations([Operation::Update]),
        ];

        let read = Rules::gather(&rules, &[Operation::Read]);
        assert_eq!(read.filter.len(), 1);
        assert!(read.assertions().is_empty());

        let update = Rules::gather(&rules, &[Operation::Update]);
        assert!(update.filter.is_empty());
        assert_eq!(update.after.len(), 1);
    }
}
