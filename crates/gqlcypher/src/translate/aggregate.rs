use super::{Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, FieldTy, Operation, Relationship, Target},
    stmt::{Call, Clause, Expr, ExprReduce, Filterable, Match, Projection, Return, Statement, Variable},
    Error, Result,
};

impl<'a> Translator<'a> {
    /// `postsAggregate`: counts and field aggregations over every matched
    /// node, returned as a single map.
    pub(crate) fn root_aggregate(&mut self, entity: &'a Entity, tree: &ResolveTree) -> Result<Statement> {
        let this = self.env.variable("this");
        let subject = Subject::Entity(entity);

        let filter = self.filter_arg(&this, subject, tree.get_arg("where"))?;
        let rules = Rules::entity(entity, &[Operation::Aggregate]);
        let guard = self.lower_rules(&this, entity, &rules.filter)?;

        let mut entries = vec![];
        let mut aggregated = vec![];
        for field in tree.all_fields() {
            match field.name.as_str() {
                "__typename" => {}
                "count" => entries.push((
                    field.response_key().to_string(),
                    Expr::func("count", [Expr::from(&this)]),
                )),
                _ => {
                    let (schema_field, value) = self.field_aggregate(&this, subject, field)?;
                    aggregated.push(schema_field);
                    entries.push((field.response_key().to_string(), value));
                }
            }
        }

        let mut assertions = rules.assertions();
        let field_rules = Rules::fields(aggregated, &[Operation::Aggregate]);
        let field_guard = self.lower_rules(&this, entity, &field_rules.filter)?;
        assertions.extend(field_rules.assertions());
        let assertion = self.lower_rules(&this, entity, &assertions)?;

        let mut stmt = Statement::new();
        stmt.push(
            Match::new(self.node_pattern(&this, entity)?)
                .filter(Expr::and_all([filter, guard, field_guard])),
        );
        stmt.extend(auth::assertion(assertion));
        stmt.push(Return::new(Projection::default().item(Expr::map(entries), &this)));
        Ok(stmt)
    }

    /// `likesAggregate { count node { .. } edge { .. } }` selected on a
    /// node.
    pub(crate) fn aggregate_selection(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        rel: &'a Relationship,
        tree: &ResolveTree,
    ) -> Result<(Clause, Variable)> {
        if !rel.aggregate {
            return Err(Error::invalid_request(format!(
                "aggregation is not available on `{}`",
                field.name
            )));
        }

        let Some(Target::Entity(target)) = self.schema.target(field) else {
            return Err(Error::invalid_request(format!(
                "aggregations of `{}` require a single target type",
                field.name
            )));
        };

        let properties = self.edge_properties(rel)?;
        let node = self.env.variable("this");
        let edge = match properties {
            Some(_) => Some(self.env.variable("edge")),
            None => None,
        };

        let filter = self.filter_arg(&node, Subject::Entity(target), tree.get_arg("where"))?;
        let rules = Rules::entity(target, &[Operation::Aggregate]);
        let guard = self.lower_rules(&node, target, &rules.filter)?;
        let assertion = self.lower_rules(&node, target, &rules.assertions())?;

        let mut entries = vec![];
        for selected in tree.all_fields() {
            let key = selected.response_key().to_string();
            match selected.name.as_str() {
                "__typename" => {}
                "count" => entries.push((key, Expr::func("count", [Expr::from(&node)]))),
                "node" => {
                    let fields = self.aggregate_entries(&node, Subject::Entity(target), selected)?;
                    entries.push((key, Expr::map(fields)));
                }
                "edge" => {
                    let (Some(edge), Some(properties)) = (&edge, properties) else {
                        return Err(Error::invalid_request(format!(
                            "relationship `{}` has no edge properties",
                            field.name
                        )));
                    };
                    let fields = self.aggregate_entries(edge, Subject::Edge(properties), selected)?;
                    entries.push((key, Expr::map(fields)));
                }
                other => {
                    return Err(Error::invalid_request(format!(
                        "unknown aggregate field `{other}` on `{}`",
                        field.name
                    )))
                }
            }
        }

        let pattern =
            self.relationship_pattern(parent, rel, edge.as_ref(), self.node_pattern(&node, target)?);
        let out = self.env.variable("var");

        let mut body = Statement::new();
        body.push(Match::new(pattern).filter(Expr::and_all([filter, guard])));
        body.extend(auth::assertion(assertion));
        body.push(Return::new(Projection::default().item(Expr::map(entries), &out)));

        Ok((Call::new([parent], body).into(), out))
    }

    fn aggregate_entries(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        tree: &ResolveTree,
    ) -> Result<Vec<(String, Expr)>> {
        let mut entries = vec![];
        for field in tree.all_fields() {
            if field.name == "__typename" {
                continue;
            }
            let (_, value) = self.field_aggregate(var, subject, field)?;
            entries.push((field.response_key().to_string(), value));
        }
        Ok(entries)
    }

    /// `{ min, max, average, sum }` for numbers, `{ shortest, longest }` for
    /// strings and `{ min, max }` for temporals, limited to the selected
    /// keys.
    fn field_aggregate(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        tree: &ResolveTree,
    ) -> Result<(&'a Field, Expr)> {
        let Some(field) = subject.find_field(&tree.name).filter(|field| field.is_stored()) else {
            return Err(Error::invalid_request(format!(
                "cannot aggregate `{}` on `{}`",
                tree.name,
                subject.name()
            )));
        };

        let property = var.property(field.property_name());
        let mut entries = vec![];

        for selected in tree.all_fields() {
            let function = selected.name.as_str();
            let value = match (&field.ty, function) {
                (_, "__typename") => continue,
                (FieldTy::Primitive(p), "min" | "max") if p.scalar.is_numeric() => {
                    Expr::func(function, [property.clone()])
                }
                (FieldTy::Primitive(p), "average") if p.scalar.is_numeric() => {
                    Expr::func("avg", [property.clone()])
                }
                (FieldTy::Primitive(p), "sum") if p.scalar.is_numeric() => {
                    Expr::func("sum", [property.clone()])
                }
                (FieldTy::Primitive(p), "shortest" | "longest") if p.scalar.is_string_like() => {
                    self.extreme_length(property.clone(), function == "shortest")
                }
                (FieldTy::Temporal(t), "min" | "max") if t.kind.is_ordered() => {
                    Expr::func("toString", [Expr::func(function, [property.clone()])])
                }
                _ => {
                    return Err(Error::invalid_request(format!(
                        "`{function}` is not available for `{}`",
                        field.name
                    )))
                }
            };
            entries.push((selected.response_key().to_string(), value));
        }

        Ok((field, Expr::map(entries)))
    }

    /// The shortest or longest string of a column:
    /// `reduce(acc = head(list), item IN list | CASE WHEN size(item) < size(acc) THEN item ELSE acc END)`
    fn extreme_length(&mut self, property: Expr, shortest: bool) -> Expr {
        let accumulator = self.env.variable("acc");
        let item = self.env.variable("item");
        let list = Expr::collect(property);

        let size = |var: &Variable| Expr::func("size", [Expr::from(var)]);
        let better = if shortest {
            Expr::lt(size(&item), size(&accumulator))
        } else {
            Expr::gt(size(&item), size(&accumulator))
        };

        ExprReduce {
            init: Box::new(Expr::func("head", [list.clone()])),
            list: Box::new(list),
            expr: Box::new(Expr::case(
                vec![(better, Expr::from(&item))],
                Some(Expr::from(&accumulator)),
            )),
            accumulator,
            variable: item,
        }
        .into()
    }
}
