//! Authorization rules compiled into the statement.
//!
//! Filter rules narrow the matched nodes. Every other rule becomes an
//! assertion: a `WITH * WHERE apoc.util.validatePredicate(..)` clause that
//! aborts the transaction with [`FORBIDDEN`] when its predicate does not
//! hold. The executor error is mapped back to [`Error::forbidden`] by the
//! compiler.
//!
//! [`Error::forbidden`]: gqlcypher_core::Error::forbidden

mod lower;

mod rules;
pub(crate) use rules::Rules;

use gqlcypher_core::stmt::{Clause, Expr, Filterable, With};

/// Marker carried by the error raised when an assertion fails.
pub(crate) const FORBIDDEN: &str = "@gqlcypher/FORBIDDEN";

/// Marker carried by the error raised when a relationship cardinality check
/// fails.
pub(crate) const RELATIONSHIP_REQUIRED: &str = "@gqlcypher/RELATIONSHIP-REQUIRED";

/// `WITH * WHERE apoc.util.validatePredicate(NOT (..), "<FORBIDDEN>", [0])`
///
/// A predicate that evaluates to null is treated as failing.
pub(crate) fn assertion(predicate: Option<Expr>) -> Option<Clause> {
    let predicate = predicate?;
    Some(With::star().filter(validate(predicate, FORBIDDEN)).into())
}

/// `apoc.util.validatePredicate(NOT (coalesce(predicate, false)), message, [0])`
pub(crate) fn validate(predicate: Expr, message: &str) -> Expr {
    let holds = Expr::func("coalesce", [predicate, Expr::from(false)]);
    Expr::func(
        "apoc.util.validatePredicate",
        [
            Expr::not(holds),
            Expr::from(message),
            Expr::list([Expr::from(0)]),
        ],
    )
}
