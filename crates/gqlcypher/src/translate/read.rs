use super::{projection::selection_types, Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Operation},
    stmt::{Expr, Filterable, Match, Projection, Return, Statement, With},
    Result,
};

impl<'a> Translator<'a> {
    /// `posts(where, options) { .. }`
    ///
    /// ```text
    /// MATCH (this:Post)
    /// WHERE <where> AND <filter rules>
    /// <subqueries of the selection>
    /// <read assertions>
    /// RETURN this { .. } AS this
    /// ```
    ///
    /// With sorting or pagination the projection moves into a `WITH` so the
    /// ordering runs on projected values, including computed ones.
    pub(crate) fn read(&mut self, entity: &'a Entity, tree: &ResolveTree) -> Result<Statement> {
        let this = self.env.variable("this");
        let subject = Subject::Entity(entity);

        let filter = self.filter_arg(&this, subject, tree.get_arg("where"))?;
        let rules = Rules::entity(entity, &[Operation::Read]);
        let guard = self.lower_rules(&this, entity, &rules.filter)?;
        let assertion = self.lower_rules(&this, entity, &rules.assertions())?;

        let options = self.options(&this, subject, tree.get_arg("options"), self.config.limit)?;
        let selection = tree.fields_for(&selection_types(entity));
        let shape = self.shape(&this, subject, &selection, &options.sort_keys())?;

        let mut stmt = Statement::new();
        stmt.push(
            Match::new(self.node_pattern(&this, entity)?)
                .filter(Expr::and_all([filter, guard, shape.filter.clone()])),
        );
        stmt.extend(shape.subqueries.iter().cloned());
        stmt.extend(auth::assertion(Expr::and_all([assertion, shape.assertion.clone()])));

        let projected = shape.project(&this);
        if options.is_empty() {
            stmt.push(Return::new(Projection::default().item(projected, &this)));
        } else {
            let mut with = With::new(Projection::default().item(projected, &this));
            options.apply(&mut with, &this);
            stmt.push(with);
            stmt.push(Return::new(Projection::variables([&this])));
        }

        Ok(stmt)
    }
}
