use super::{junction, ScalarOp};
use crate::translate::{input, Subject, Translator};

use gqlcypher_core::{
    schema::{Entity, Field, FieldTy, Operation, RelationshipProperties, Target},
    stmt::{
        Expr, Filterable, Match, Projection, ProjectionItem, Statement, Value, Variable, With,
    },
    Error, Result,
};

/// The aggregation a `<field>_<FN>_<OP>` filter key applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregateFn {
    Min,
    Max,
    Average,
    Sum,
    ShortestLength,
    LongestLength,
    AverageLength,
}

impl AggregateFn {
    fn split(key: &str) -> Option<(&str, AggregateFn)> {
        const SUFFIXES: &[(&str, AggregateFn)] = &[
            ("_AVERAGE_LENGTH", AggregateFn::AverageLength),
            ("_SHORTEST_LENGTH", AggregateFn::ShortestLength),
            ("_LONGEST_LENGTH", AggregateFn::LongestLength),
            ("_AVERAGE", AggregateFn::Average),
            ("_MIN", AggregateFn::Min),
            ("_MAX", AggregateFn::Max),
            ("_SUM", AggregateFn::Sum),
        ];

        SUFFIXES.iter().find_map(|(suffix, function)| {
            key.strip_suffix(suffix)
                .filter(|name| !name.is_empty())
                .map(|name| (name, *function))
        })
    }

    fn is_length(self) -> bool {
        matches!(
            self,
            AggregateFn::ShortestLength | AggregateFn::LongestLength | AggregateFn::AverageLength
        )
    }

    fn supports(self, field: &Field) -> bool {
        if field.is_list() {
            return false;
        }

        match &field.ty {
            FieldTy::Primitive(primitive) if self.is_length() => primitive.scalar.is_string_like(),
            FieldTy::Primitive(primitive) => primitive.scalar.is_numeric(),
            FieldTy::Temporal(temporal) => {
                matches!(self, AggregateFn::Min | AggregateFn::Max) && temporal.kind.is_ordered()
            }
            _ => false,
        }
    }

    fn apply(self, property: Expr) -> Expr {
        let size = |expr| Expr::func("size", [expr]);
        match self {
            AggregateFn::Min => Expr::func("min", [property]),
            AggregateFn::Max => Expr::func("max", [property]),
            AggregateFn::Average => Expr::func("avg", [property]),
            AggregateFn::Sum => Expr::func("sum", [property]),
            AggregateFn::ShortestLength => Expr::func("min", [size(property)]),
            AggregateFn::LongestLength => Expr::func("max", [size(property)]),
            AggregateFn::AverageLength => Expr::func("avg", [size(property)]),
        }
    }
}

/// Splits the comparison off an aggregate filter key. `_EQUAL` is the
/// explicit equality suffix.
fn split_comparison(key: &str) -> (&str, ScalarOp) {
    const SUFFIXES: &[(&str, ScalarOp)] = &[
        ("_EQUAL", ScalarOp::Eq),
        ("_GTE", ScalarOp::Gte),
        ("_GT", ScalarOp::Gt),
        ("_LTE", ScalarOp::Lte),
        ("_LT", ScalarOp::Lt),
    ];

    SUFFIXES
        .iter()
        .find_map(|(suffix, op)| key.strip_suffix(suffix).map(|rest| (rest, *op)))
        .unwrap_or((key, ScalarOp::Eq))
}

impl<'a> Translator<'a> {
    /// Filters on aggregates computed over the nodes related through
    /// `field`, e.g. `likesAggregate: { count_GT: 10 }`.
    ///
    /// Compiles to `EXISTS { MATCH .. WITH <aggregates> WHERE <predicate> }`
    /// so the aggregates are computed once per candidate node.
    pub(crate) fn aggregate_filter(
        &mut self,
        var: &Variable,
        field: &'a Field,
        value: &Value,
    ) -> Result<Option<Expr>> {
        let Some(rel) = field.as_relationship().filter(|rel| rel.aggregate) else {
            return Err(Error::invalid_request(format!(
                "aggregation is not available on `{}`",
                field.name
            )));
        };

        let Some(Target::Entity(target)) = self.schema.target(field) else {
            return Err(Error::invalid_request(format!(
                "aggregate filters on `{}` require a single target type",
                field.name
            )));
        };

        let properties = self.edge_properties(rel)?;
        let node = self.env.variable("this");
        let edge = match properties {
            Some(_) => Some(self.env.variable("edge")),
            None => None,
        };

        let mut items = vec![];
        let Some(predicate) =
            self.aggregate_condition(&node, edge.as_ref(), target, properties, value, &mut items)?
        else {
            return Ok(None);
        };

        let guard = self.rule_filter(&node, target, &[Operation::Aggregate])?;
        let pattern =
            self.relationship_pattern(var, rel, edge.as_ref(), self.node_pattern(&node, target)?);

        let mut subquery = Statement::from(Match::new(pattern).filter(guard));
        subquery.push(With::new(Projection::items(items)).filter(predicate));
        Ok(Some(Expr::exists(subquery)))
    }

    fn aggregate_condition(
        &mut self,
        node: &Variable,
        edge: Option<&Variable>,
        target: &'a Entity,
        properties: Option<&'a RelationshipProperties>,
        value: &Value,
        items: &mut Vec<ProjectionItem>,
    ) -> Result<Option<Expr>> {
        let mut predicates = vec![];

        for (key, value) in input::expect_map("aggregate where", value)? {
            let predicate = match key.as_str() {
                "AND" | "OR" => {
                    let mut nested = vec![];
                    for item in input::expect_list(key, value)? {
                        nested.push(
                            self.aggregate_condition(node, edge, target, properties, item, items)?,
                        );
                    }
                    junction(key, nested)
                }
                "NOT" => self
                    .aggregate_condition(node, edge, target, properties, value, items)?
                    .map(Expr::not),
                "node" => self.aggregate_fields(node, Subject::Entity(target), value, items)?,
                "edge" => match (edge, properties) {
                    (Some(edge), Some(properties)) => {
                        self.aggregate_fields(edge, Subject::Edge(properties), value, items)?
                    }
                    _ => {
                        return Err(Error::invalid_request(format!(
                            "relationship to `{}` has no edge properties",
                            target.name
                        )))
                    }
                },
                _ => Some(self.count_condition(node, key, value, items)?),
            };
            predicates.push(predicate);
        }

        Ok(Expr::and_all(predicates))
    }

    fn count_condition(
        &mut self,
        node: &Variable,
        key: &str,
        value: &Value,
        items: &mut Vec<ProjectionItem>,
    ) -> Result<Expr> {
        let (name, op) = ScalarOp::split(key);
        let comparable = matches!(
            op,
            ScalarOp::Eq | ScalarOp::Lt | ScalarOp::Lte | ScalarOp::Gt | ScalarOp::Gte
        );
        if name != "count" || !comparable {
            return Err(Error::invalid_request(format!(
                "unknown aggregate filter `{key}`"
            )));
        }

        let count = input::expect_int(key, value)?;
        let alias = self.aggregate_alias(items, Expr::func("count", [node.into()]));
        let param = self.param(&format!("{node}_{key}"), count);
        Ok(op.apply(alias.into(), param))
    }

    fn aggregate_fields(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        value: &Value,
        items: &mut Vec<ProjectionItem>,
    ) -> Result<Option<Expr>> {
        let mut predicates = vec![];

        for (key, value) in input::expect_map("aggregate where", value)? {
            let predicate = match key.as_str() {
                "AND" | "OR" => {
                    let mut nested = vec![];
                    for item in input::expect_list(key, value)? {
                        nested.push(self.aggregate_fields(var, subject, item, items)?);
                    }
                    junction(key, nested)
                }
                "NOT" => self
                    .aggregate_fields(var, subject, value, items)?
                    .map(Expr::not),
                _ => Some(self.aggregate_field(var, subject, key, value, items)?),
            };
            predicates.push(predicate);
        }

        Ok(Expr::and_all(predicates))
    }

    fn aggregate_field(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        key: &str,
        value: &Value,
        items: &mut Vec<ProjectionItem>,
    ) -> Result<Expr> {
        let (rest, op) = split_comparison(key);
        let found = AggregateFn::split(rest)
            .and_then(|(name, function)| Some((subject.find_field(name)?, function)));

        let Some((field, function)) = found.filter(|(field, function)| function.supports(field))
        else {
            return Err(Error::invalid_request(format!(
                "unknown aggregate filter `{key}` on `{}`",
                subject.name()
            )));
        };

        let aggregate = function.apply(var.property(field.property_name()));
        let alias = self.aggregate_alias(items, aggregate);

        let hint = format!("{var}_{key}");
        let rhs = match &field.ty {
            FieldTy::Temporal(_) => self.field_value(&hint, field, value)?,
            _ if value.as_f64().is_some() => self.param(&hint, value.clone()),
            _ => {
                return Err(Error::invalid_request(format!(
                    "`{key}` expects a number, got {}",
                    value.type_name()
                )))
            }
        };

        Ok(op.apply(alias.into(), rhs))
    }

    /// Projects `expr` in the aggregating `WITH`, reusing the alias of an
    /// identical aggregate.
    fn aggregate_alias(&mut self, items: &mut Vec<ProjectionItem>, expr: Expr) -> Variable {
        let existing = items
            .iter()
            .find(|item| item.expr == expr)
            .and_then(|item| item.alias.clone());

        existing.unwrap_or_else(|| {
            let alias = self.env.variable("var");
            items.push(ProjectionItem::aliased(expr, &alias));
            alias
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_aggregate_keys() {
        assert_eq!(split_comparison("title_SHORTEST_LENGTH_GT"), ("title_SHORTEST_LENGTH", ScalarOp::Gt));
        assert_eq!(split_comparison("rating_AVERAGE_EQUAL"), ("rating_AVERAGE", ScalarOp::Eq));
        assert_eq!(
            AggregateFn::split("title_AVERAGE_LENGTH"),
            Some(("title", AggregateFn::AverageLength))
        );
        assert_eq!(AggregateFn::split("rating_AVERAGE"), Some(("rating", AggregateFn::Average)));
        assert_eq!(AggregateFn::split("rating"), None);
    }
}
