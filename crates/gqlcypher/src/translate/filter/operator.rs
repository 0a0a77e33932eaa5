use gqlcypher_core::{
    schema::{Field, FieldTy},
    stmt::{Expr, Value},
    Error, Result,
};

/// The comparison selected by a scalar filter key's suffix, e.g.
/// `title_STARTS_WITH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarOp {
    Eq,
    Not,
    In,
    NotIn,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Matches,
    Includes,
    NotIncludes,
    Distance,
}

// Longer suffixes first so `_NOT_IN` is not read as `_IN`.
const SUFFIXES: &[(&str, ScalarOp)] = &[
    ("_NOT_CONTAINS", ScalarOp::NotContains),
    ("_NOT_STARTS_WITH", ScalarOp::NotStartsWith),
    ("_NOT_ENDS_WITH", ScalarOp::NotEndsWith),
    ("_NOT_INCLUDES", ScalarOp::NotIncludes),
    ("_NOT_IN", ScalarOp::NotIn),
    ("_NOT", ScalarOp::Not),
    ("_IN", ScalarOp::In),
    ("_LTE", ScalarOp::Lte),
    ("_LT", ScalarOp::Lt),
    ("_GTE", ScalarOp::Gte),
    ("_GT", ScalarOp::Gt),
    ("_CONTAINS", ScalarOp::Contains),
    ("_STARTS_WITH", ScalarOp::StartsWith),
    ("_ENDS_WITH", ScalarOp::EndsWith),
    ("_MATCHES", ScalarOp::Matches),
    ("_INCLUDES", ScalarOp::Includes),
    ("_DISTANCE", ScalarOp::Distance),
];

impl ScalarOp {
    /// Splits a filter key into the field name and operator.
    pub(crate) fn split(key: &str) -> (&str, ScalarOp) {
        for (suffix, op) in SUFFIXES {
            if let Some(name) = key.strip_suffix(suffix) {
                if !name.is_empty() {
                    return (name, *op);
                }
            }
        }
        (key, ScalarOp::Eq)
    }

    pub(crate) fn is_membership(self) -> bool {
        matches!(self, ScalarOp::In | ScalarOp::NotIn)
    }

    /// Operators whose operand is one element of a list field.
    pub(crate) fn is_element(self) -> bool {
        matches!(self, ScalarOp::Includes | ScalarOp::NotIncludes)
    }

    pub(crate) fn is_distance(self) -> bool {
        matches!(
            self,
            ScalarOp::Lt | ScalarOp::Lte | ScalarOp::Gt | ScalarOp::Gte | ScalarOp::Distance
        )
    }

    fn is_string(self) -> bool {
        matches!(
            self,
            ScalarOp::Contains
                | ScalarOp::NotContains
                | ScalarOp::StartsWith
                | ScalarOp::NotStartsWith
                | ScalarOp::EndsWith
                | ScalarOp::NotEndsWith
                | ScalarOp::Matches
        )
    }

    fn is_ordering(self) -> bool {
        matches!(self, ScalarOp::Lt | ScalarOp::Lte | ScalarOp::Gt | ScalarOp::Gte)
    }

    /// Rejects operators the field's type does not support.
    pub(crate) fn check(self, field: &Field, key: &str, value: &Value) -> Result<()> {
        let supported = match &field.ty {
            FieldTy::Primitive(primitive) => {
                if self.is_element() {
                    primitive.list
                } else if self.is_string() {
                    !primitive.list && primitive.scalar.is_string_like()
                } else if self.is_ordering() {
                    !primitive.list
                        && (primitive.scalar.is_numeric() || primitive.scalar.is_string_like())
                } else {
                    self != ScalarOp::Distance
                }
            }
            FieldTy::Temporal(temporal) => {
                if self.is_element() {
                    temporal.list
                } else if self.is_ordering() {
                    !temporal.list && temporal.kind.is_ordered()
                } else {
                    matches!(self, ScalarOp::Eq | ScalarOp::Not | ScalarOp::In | ScalarOp::NotIn)
                }
            }
            FieldTy::Point(point) => {
                if self.is_element() {
                    point.list
                } else if self.is_distance() {
                    !point.list
                } else {
                    matches!(self, ScalarOp::Eq | ScalarOp::Not)
                }
            }
            _ => false,
        };

        if !supported {
            return Err(Error::invalid_request(format!(
                "filter `{key}` is not supported on field `{}`",
                field.name
            )));
        }

        if self.is_string() && !value.is_null() && value.as_str().is_none() {
            return Err(Error::invalid_request(format!(
                "`{key}` expects a string, got {}",
                value.type_name()
            )));
        }

        Ok(())
    }

    /// Builds the comparison of `lhs` against `rhs`.
    pub(crate) fn apply(self, lhs: Expr, rhs: Expr) -> Expr {
        match self {
            ScalarOp::Eq | ScalarOp::Distance => Expr::eq(lhs, rhs),
            ScalarOp::Not => Expr::not(Expr::eq(lhs, rhs)),
            ScalarOp::In => Expr::in_list(lhs, rhs),
            ScalarOp::NotIn => Expr::not(Expr::in_list(lhs, rhs)),
            ScalarOp::Lt => Expr::lt(lhs, rhs),
            ScalarOp::Lte => Expr::le(lhs, rhs),
            ScalarOp::Gt => Expr::gt(lhs, rhs),
            ScalarOp::Gte => Expr::ge(lhs, rhs),
            ScalarOp::Contains => Expr::contains(lhs, rhs),
            ScalarOp::NotContains => Expr::not(Expr::contains(lhs, rhs)),
            ScalarOp::StartsWith => Expr::starts_with(lhs, rhs),
            ScalarOp::NotStartsWith => Expr::not(Expr::starts_with(lhs, rhs)),
            ScalarOp::EndsWith => Expr::ends_with(lhs, rhs),
            ScalarOp::NotEndsWith => Expr::not(Expr::ends_with(lhs, rhs)),
            ScalarOp::Matches => Expr::matches(lhs, rhs),
            ScalarOp::Includes => Expr::in_list(rhs, lhs),
            ScalarOp::NotIncludes => Expr::not(Expr::in_list(rhs, lhs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefers_the_longest_suffix() {
        assert_eq!(ScalarOp::split("title_NOT_IN"), ("title", ScalarOp::NotIn));
        assert_eq!(ScalarOp::split("title_IN"), ("title", ScalarOp::In));
        assert_eq!(ScalarOp::split("likes_LTE"), ("likes", ScalarOp::Lte));
        assert_eq!(
            ScalarOp::split("title_NOT_STARTS_WITH"),
            ("title", ScalarOp::NotStartsWith)
        );
        assert_eq!(ScalarOp::split("title"), ("title", ScalarOp::Eq));
    }

    #[test]
    fn bare_suffix_is_a_field_name() {
        assert_eq!(ScalarOp::split("_IN"), ("_IN", ScalarOp::Eq));
    }
}
