use crate::translate::{Subject, Translator};

use gqlcypher_core::{
    schema::{Field, Operation},
    stmt::{Expr, Filterable, Match, NodePattern, Pattern, Statement, Value, Variable},
    Error, Result,
};

/// How a relationship filter quantifies over the related nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RelQuantifier {
    /// No suffix: at least one related node matches
    Plain,

    /// `_NOT`: no related node matches
    Not,
    Some,
    None,
    All,

    /// Exactly one related node matches
    Single,
}

impl RelQuantifier {
    /// Splits a quantifier suffix off a filter key.
    pub(crate) fn split(key: &str) -> (&str, RelQuantifier) {
        const SUFFIXES: &[(&str, RelQuantifier)] = &[
            ("_SOME", RelQuantifier::Some),
            ("_NONE", RelQuantifier::None),
            ("_ALL", RelQuantifier::All),
            ("_SINGLE", RelQuantifier::Single),
            ("_NOT", RelQuantifier::Not),
        ];

        for (suffix, quantifier) in SUFFIXES {
            if let Some(base) = key.strip_suffix(suffix) {
                if !base.is_empty() {
                    return (base, *quantifier);
                }
            }
        }
        (key, RelQuantifier::Plain)
    }

    /// Builds the predicate for one concrete target.
    ///
    /// `pattern` matches the related nodes, `guard` is always required of
    /// them and `inner` is the user's filter. For `Single` the result is a
    /// `COUNT {}` expression that [`RelQuantifier::combine`] compares.
    pub(crate) fn quantify(
        self,
        pattern: Pattern,
        guard: Option<Expr>,
        inner: Option<Expr>,
    ) -> Option<Expr> {
        let subquery = |predicate: Option<Expr>| Statement::from(Match::new(pattern).filter(predicate));

        match self {
            RelQuantifier::Plain | RelQuantifier::Some => {
                Some(Expr::exists(subquery(Expr::and_all([guard, inner]))))
            }
            RelQuantifier::Not | RelQuantifier::None => Some(Expr::not(Expr::exists(subquery(
                Expr::and_all([guard, inner]),
            )))),
            // Every related node matches: none fails the filter
            RelQuantifier::All => {
                let inner = inner?;
                Some(Expr::not(Expr::exists(subquery(Expr::and_all([
                    guard,
                    Some(Expr::not(inner)),
                ])))))
            }
            RelQuantifier::Single => Some(Expr::count_subquery(subquery(Expr::and_all([
                guard, inner,
            ])))),
        }
    }

    /// Combines the per-target predicates of a polymorphic relationship.
    pub(crate) fn combine(self, predicates: Vec<Option<Expr>>) -> Option<Expr> {
        match self {
            RelQuantifier::Plain | RelQuantifier::Some => Expr::or_any(predicates),
            RelQuantifier::Not | RelQuantifier::None | RelQuantifier::All => {
                Expr::and_all(predicates)
            }
            RelQuantifier::Single => {
                let total = predicates.into_iter().flatten().reduce(|lhs, rhs| Expr::add(lhs, rhs))?;
                Some(Expr::eq(total, 1))
            }
        }
    }
}

impl<'a> Translator<'a> {
    /// Filters on the nodes related through `field`.
    pub(crate) fn relationship_filter(
        &mut self,
        var: &Variable,
        field: &'a Field,
        quantifier: RelQuantifier,
        value: &Value,
    ) -> Result<Option<Expr>> {
        let Some(rel) = field.as_relationship() else {
            return Err(Error::invalid_request(format!(
                "`{}` is not a relationship",
                field.name
            )));
        };

        if !field.filterable {
            return Err(Error::invalid_request(format!(
                "relationship `{}` cannot be filtered",
                field.name
            )));
        }

        // `author: null` tests for the absence of any related node
        if value.is_null() {
            let node = self.env.variable("this");
            let pattern = self.relationship_pattern(
                var,
                rel,
                None,
                NodePattern::new(&node),
            );
            let exists = Expr::exists(Match::new(pattern));
            return match quantifier {
                RelQuantifier::Plain => Ok(Some(Expr::not(exists))),
                RelQuantifier::Not => Ok(Some(exists)),
                _ => Err(Error::invalid_request(format!(
                    "`{}` does not accept null with a quantifier",
                    field.name
                ))),
            };
        }

        let mut predicates = vec![];
        for (target, filter) in self.filter_targets(field, value)? {
            let node = self.env.variable("this");
            let inner = self.filter(&node, Subject::Entity(target), &filter)?;
            let guard = self.rule_filter(&node, target, &[Operation::Read])?;
            let pattern = self.relationship_pattern(var, rel, None, self.node_pattern(&node, target)?);
            predicates.push(quantifier.quantify(pattern, guard, inner));
        }

        Ok(quantifier.combine(predicates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_quantifier_suffix() {
        assert_eq!(RelQuantifier::split("actors_SOME"), ("actors", RelQuantifier::Some));
        assert_eq!(RelQuantifier::split("actors_NOT"), ("actors", RelQuantifier::Not));
        assert_eq!(RelQuantifier::split("actors"), ("actors", RelQuantifier::Plain));
        assert_eq!(
            RelQuantifier::split("actorsConnection_ALL"),
            ("actorsConnection", RelQuantifier::All)
        );
    }

    #[test]
    fn single_sums_counts_across_targets() {
        let combined = RelQuantifier::Single
            .combine(vec![Some(Expr::value(1)), Some(Expr::value(2))])
            .unwrap();
        assert_eq!(
            combined,
            Expr::eq(Expr::add(Expr::value(1), Expr::value(2)), 1)
        );
    }

    #[test]
    fn all_without_inner_filter_places_no_restriction() {
        let pattern = Pattern::node(NodePattern::anonymous());
        assert_eq!(RelQuantifier::All.quantify(pattern, None, None), None);
    }
}
