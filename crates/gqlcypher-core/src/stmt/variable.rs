use super::Expr;

use std::{fmt, sync::Arc};

/// A named binding in a statement: a matched node or relationship, a
/// projection alias, or the iteration variable of a list expression.
///
/// Variables are only created by [`Environment::variable`], which
/// guarantees no two variables of one statement share a name.
///
/// [`Environment::variable`]: crate::Environment::variable
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Variable(Arc<str>);

impl Variable {
    pub(crate) fn new(name: Arc<str>) -> Variable {
        Variable(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// `variable.name`
    pub fn property(&self, name: impl Into<String>) -> Expr {
        Expr::property(self, name)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.0)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Variable> for Expr {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<&Variable> for Expr {
    fn from(value: &Variable) -> Self {
        Self::Variable(value.clone())
    }
}
