use super::Expr;

use std::{fmt, sync::Arc};

/// A reference to a bound parameter, rendered as `$name`.
///
/// The bound value lives in the [`Environment`] that allocated the name;
/// the renderer copies it into the parameter table when the reference is
/// rendered.
///
/// [`Environment`]: crate::Environment
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Param(Arc<str>);

impl Param {
    pub(crate) fn new(name: Arc<str>) -> Param {
        Param(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// `$param.name`, used to reach into map parameters such as the claims.
    pub fn property(&self, name: impl Into<String>) -> Expr {
        Expr::property(self, name)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param(${})", self.0)
    }
}

impl From<Param> for Expr {
    fn from(value: Param) -> Self {
        Self::Param(value)
    }
}

impl From<&Param> for Expr {
    fn from(value: &Param) -> Self {
        Self::Param(value.clone())
    }
}
