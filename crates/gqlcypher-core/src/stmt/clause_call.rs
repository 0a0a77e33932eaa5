use super::{Clause, Statement, Variable};

/// `CALL { [WITH imports] body }`
///
/// Variables of the enclosing scope are visible inside the body only when
/// listed in `imports`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub imports: Vec<Variable>,
    pub body: Statement,
}

impl Call {
    pub fn new<'a>(imports: impl IntoIterator<Item = &'a Variable>, body: Statement) -> Call {
        Call {
            imports: imports.into_iter().cloned().collect(),
            body,
        }
    }
}

impl From<Call> for Clause {
    fn from(value: Call) -> Self {
        Clause::Call(value)
    }
}
