use super::{
    statement::{Block, Lines},
    Comma, Delimited, Formatter, Params, ToCypher,
};

use gqlcypher_core::stmt::{self, Clause, SortDirection};

impl ToCypher for &Clause {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Clause::Match(clause) => {
                if clause.optional {
                    f.dst.push_str("OPTIONAL ");
                }
                let pattern = &clause.pattern;
                fmt!(f, "MATCH " pattern);
                if let Some(predicate) = &clause.predicate {
                    fmt!(f, "\nWHERE " predicate);
                }
            }
            Clause::Create(clause) => {
                let pattern = &clause.pattern;
                fmt!(f, "CREATE " pattern);
            }
            Clause::Merge(clause) => {
                let pattern = &clause.pattern;
                fmt!(f, "MERGE " pattern);
                if !clause.on_create.is_empty() {
                    fmt!(f, "\nON CREATE SET" Lines(&clause.on_create));
                }
                if !clause.on_match.is_empty() {
                    fmt!(f, "\nON MATCH SET" Lines(&clause.on_match));
                }
            }
            Clause::Set(clause) => {
                fmt!(f, "SET" Lines(&clause.items));
            }
            Clause::Remove(clause) => {
                fmt!(f, "REMOVE " Comma(&clause.items));
            }
            Clause::Delete(clause) => {
                if clause.detach {
                    f.dst.push_str("DETACH ");
                }
                fmt!(f, "DELETE " Comma(&clause.items));
            }
            Clause::With(clause) => {
                f.dst.push_str("WITH ");
                if clause.distinct {
                    f.dst.push_str("DISTINCT ");
                }
                fmt!(f, &clause.projection);
                clause.ordering.to_cypher(f);
                if let Some(predicate) = &clause.predicate {
                    fmt!(f, "\nWHERE " predicate);
                }
            }
            Clause::Return(clause) => {
                f.dst.push_str("RETURN ");
                if clause.distinct {
                    f.dst.push_str("DISTINCT ");
                }
                fmt!(f, &clause.projection);
                clause.ordering.to_cypher(f);
            }
            Clause::Unwind(clause) => {
                let alias = &clause.alias;
                let expr = &clause.expr;
                fmt!(f, "UNWIND " expr " AS " alias);
            }
            Clause::Call(clause) => {
                let block = Block {
                    imports: &clause.imports,
                    body: &clause.body,
                };
                fmt!(f, "CALL " block);
            }
            Clause::Union(clause) => {
                let separator = if clause.all {
                    "\nUNION ALL\n"
                } else {
                    "\nUNION\n"
                };
                fmt!(f, Delimited(&clause.branches, separator));
            }
            Clause::Raw(cypher) => f.dst.push_str(cypher),
        }
    }
}

impl ToCypher for &stmt::Projection {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut s = "";
        if self.star {
            f.dst.push('*');
            s = ", ";
        }

        for item in &self.items {
            fmt!(f, s item);
            s = ", ";
        }
    }
}

impl ToCypher for &stmt::ProjectionItem {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let expr = &self.expr;

        match &self.alias {
            // `x AS x` is just `x`
            Some(alias) if expr.as_variable() != Some(alias) => fmt!(f, expr " AS " alias),
            _ => fmt!(f, expr),
        }
    }
}

impl ToCypher for &stmt::Ordering {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.order_by.is_empty() {
            fmt!(f, "\nORDER BY " Comma(&self.order_by));
        }
        if let Some(skip) = &self.skip {
            fmt!(f, "\nSKIP " skip);
        }
        if let Some(limit) = &self.limit {
            fmt!(f, "\nLIMIT " limit);
        }
    }
}

impl ToCypher for &stmt::SortItem {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let direction = match self.direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        };
        fmt!(f, &self.expr direction);
    }
}

impl ToCypher for &stmt::SetItem {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let value = &self.value;
        fmt!(f, &self.target " = " value);
    }
}
