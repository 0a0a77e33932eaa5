use super::{statement::Block, Comma, Delimited, Formatter, Ident, Label, Params, ToCypher};

use gqlcypher_core::stmt::{self, BinaryOp, Expr};

/// An operand of an operator or postfix expression, parenthesized when its
/// own operators would otherwise bind to its neighbours.
struct Operand<'a>(&'a Expr);

/// An operand of AND, OR or XOR. Only a nested connective needs grouping.
struct Junct<'a>(&'a Expr);

/// `key: expr`
pub(super) struct Entry<'a, K, V>(pub(super) &'a K, pub(super) V);

impl ToCypher for &Expr {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            And(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Junct), " AND "));
            }
            BinaryOp(expr) => {
                fmt!(f, Operand(&expr.lhs) " " expr.op " " Operand(&expr.rhs));
            }
            Case(expr) => {
                f.dst.push_str("CASE");
                for (condition, value) in &expr.when {
                    fmt!(f, " WHEN " condition " THEN " value);
                }
                if let Some(otherwise) = expr.otherwise.as_deref() {
                    fmt!(f, " ELSE " otherwise);
                }
                f.dst.push_str(" END");
            }
            Count(expr) => {
                let block = Block {
                    imports: &[],
                    body: &expr.subquery,
                };
                fmt!(f, "COUNT " block);
            }
            Exists(expr) => {
                let block = Block {
                    imports: &[],
                    body: &expr.subquery,
                };
                fmt!(f, "EXISTS " block);
            }
            Func(expr) => {
                fmt!(f, &expr.name "(");
                if expr.distinct {
                    f.dst.push_str("DISTINCT ");
                }
                fmt!(f, Comma(&expr.args) ")");
            }
            HasLabels(expr) => {
                fmt!(f, &expr.variable);
                for label in &expr.labels {
                    fmt!(f, Label(label));
                }
            }
            IsNull(expr) => {
                let op = if expr.negate {
                    " IS NOT NULL"
                } else {
                    " IS NULL"
                };
                fmt!(f, Operand(&expr.expr) op);
            }
            List(expr) => {
                fmt!(f, "[" Comma(&expr.items) "]");
            }
            ListPredicate(expr) => {
                let quantifier = expr.quantifier.to_string();
                let variable = &expr.variable;
                let list = &*expr.list;
                let predicate = &*expr.predicate;
                fmt!(f, &quantifier "(" variable " IN " list " WHERE " predicate ")");
            }
            Map(expr) => {
                if expr.is_empty() {
                    f.dst.push_str("{}");
                } else {
                    let entries = expr.entries.iter().map(|(key, value)| Entry(key, value));
                    fmt!(f, "{ " Comma(entries) " }");
                }
            }
            MapProjection(expr) => {
                if expr.items.is_empty() {
                    fmt!(f, &expr.variable " {}");
                } else {
                    fmt!(f, &expr.variable " { " Comma(&expr.items) " }");
                }
            }
            Not(expr) => {
                let operand = &*expr.expr;
                fmt!(f, "NOT (" operand ")");
            }
            Or(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Junct), " OR "));
            }
            Param(param) => param.to_cypher(f),
            Property(expr) => {
                fmt!(f, Operand(&expr.base) "." Ident(&expr.name));
            }
            Raw(cypher) => f.dst.push_str(cypher),
            Reduce(expr) => {
                let accumulator = &expr.accumulator;
                let init = &*expr.init;
                let variable = &expr.variable;
                let list = &*expr.list;
                let body = &*expr.expr;
                fmt!(f, "reduce(" accumulator " = " init ", " variable " IN " list " | " body ")");
            }
            Slice(expr) => {
                fmt!(f, Operand(&expr.list) "[");
                fmt!(f, expr.from.as_deref() ".." expr.to.as_deref());
                f.dst.push(']');
            }
            Value(value) => value.to_cypher(f),
            Variable(variable) => variable.to_cypher(f),
            Xor(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Junct), " XOR "));
            }
        }
    }
}

impl ToCypher for Operand<'_> {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let needs_parens = match self.0 {
            Expr::And(_) | Expr::Or(_) | Expr::Xor(_) | Expr::Not(_) => true,
            Expr::BinaryOp(expr) => expr.op.is_comparison(),
            Expr::IsNull(_) => true,
            _ => false,
        };

        if needs_parens {
            fmt!(f, "(" self.0 ")");
        } else {
            self.0.to_cypher(f);
        }
    }
}

impl ToCypher for Junct<'_> {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        if self.0.is_connective() {
            fmt!(f, "(" self.0 ")");
        } else {
            self.0.to_cypher(f);
        }
    }
}

impl ToCypher for BinaryOp {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push_str(&self.to_string());
    }
}

impl ToCypher for &stmt::Variable {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.name()));
    }
}

impl ToCypher for &stmt::MapProjectionItem {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            stmt::MapProjectionItem::Property(name) => fmt!(f, "." Ident(name)),
            stmt::MapProjectionItem::Entry(key, expr) => fmt!(f, Entry(key, expr)),
        }
    }
}

impl<K: AsRef<str>, V: ToCypher> ToCypher for Entry<'_, K, V> {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0.as_ref()) ": " self.1);
    }
}
