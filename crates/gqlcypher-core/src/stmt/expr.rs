use super::*;

/// An expression in the statement AST.
///
/// Predicates are expressions too. Code that builds optional predicates
/// works with `Option<Expr>`, where `None` means "no predicate" and is
/// dropped by [`Expr::and_all`] and [`Expr::or_any`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(ExprAnd),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// `CASE WHEN .. THEN .. ELSE .. END`
    Case(ExprCase),

    /// `COUNT { ... }`
    Count(ExprCount),

    /// `EXISTS { ... }`
    Exists(ExprExists),

    /// Function call
    Func(ExprFunc),

    /// `var:Label`
    HasLabels(ExprHasLabels),

    /// `IS NULL` / `IS NOT NULL`
    IsNull(ExprIsNull),

    /// List literal
    List(ExprList),

    /// `any(x IN list WHERE ..)` and friends
    ListPredicate(ExprListPredicate),

    /// Map literal
    Map(ExprMap),

    /// `var { .a, b: expr }`
    MapProjection(ExprMapProjection),

    /// Negate a boolean expression
    Not(ExprNot),

    /// OR a set of expressions
    Or(ExprOr),

    /// Reference to a bound parameter
    Param(Param),

    /// Property access
    Property(ExprProperty),

    /// Cypher text inserted verbatim
    Raw(String),

    /// `reduce(acc = init, x IN list | expr)`
    Reduce(ExprReduce),

    /// `list[from..to]`
    Slice(ExprSlice),

    /// Literal value
    Value(Value),

    /// Reference to a variable
    Variable(Variable),

    /// XOR a set of expressions
    Xor(ExprXor),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn raw(cypher: impl Into<String>) -> Self {
        Self::Raw(cypher.into())
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Returns `true` if the expression is one of the boolean connectives.
    ///
    /// The renderer parenthesizes connectives when they appear as an
    /// operand of another expression.
    pub fn is_connective(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_) | Self::Xor(_))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}
