use super::Translator;
use crate::auth::{self, RELATIONSHIP_REQUIRED};

use gqlcypher_core::{
    schema::{Entity, Field, Target},
    stmt::{
        Call, Clause, Expr, Filterable, Match, NodePattern, Projection, Return, Statement, Variable,
        With,
    },
    Result,
};

impl<'a> Translator<'a> {
    /// Cardinality checks for the to-one relationships of a written node.
    ///
    /// A required relationship must reach exactly one node after a create,
    /// or after an update that touched it. An optional one that was touched
    /// must reach at most one.
    pub(crate) fn required_checks(
        &mut self,
        node: &Variable,
        entity: &'a Entity,
        creating: bool,
        touched: &[&'a Field],
    ) -> Result<Vec<Clause>> {
        let mut checks = vec![];

        for field in entity.relationship_fields() {
            let Some(rel) = field.as_relationship().filter(|rel| !rel.is_many()) else {
                continue;
            };
            let was_touched = touched.iter().any(|touched| std::ptr::eq(*touched, field));

            let exactly_one = rel.is_required() && (creating || was_touched);
            if !exactly_one && !was_touched {
                continue;
            }

            let target = match self.schema.target(field) {
                Some(Target::Entity(target)) => {
                    NodePattern::anonymous().labels(target.resolve_labels(self.cx)?)
                }
                _ => NodePattern::anonymous(),
            };
            let edge = self.env.variable("edge");
            let count = self.env.variable("count");
            let out = self.env.variable("var");

            let (holds, message) = if exactly_one {
                (
                    Expr::eq(&count, 1),
                    format!("{RELATIONSHIP_REQUIRED} {}.{} required exactly once", entity.name, field.name),
                )
            } else {
                (
                    Expr::le(&count, 1),
                    format!(
                        "{RELATIONSHIP_REQUIRED} {}.{} must not have more than one relationship",
                        entity.name, field.name
                    ),
                )
            };

            let mut body = Statement::new();
            body.push(Match::new(self.relationship_pattern(node, rel, Some(&edge), target)));
            body.push(
                With::new(Projection::default().item(Expr::func("count", [Expr::from(&edge)]), &count))
                    .filter(auth::validate(holds, &message)),
            );
            body.push(Return::new(Projection::default().item(&count, &out)));

            checks.push(Call::new([node], body).into());
        }

        Ok(checks)
    }
}
