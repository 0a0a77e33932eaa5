use super::{Comma, Formatter, Params, ToCypher};

use gqlcypher_core::stmt::{Statement, Variable};

const INDENT: &str = "    ";

impl ToCypher for &Statement {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut s = "";
        for clause in &self.clauses {
            fmt!(f, s clause);
            s = "\n";
        }
    }
}

/// A statement rendered as a `{ .. }` block, optionally importing variables
/// from the enclosing scope with a leading `WITH`.
pub(super) struct Block<'a> {
    pub(super) imports: &'a [Variable],
    pub(super) body: &'a Statement,
}

impl ToCypher for Block<'_> {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut body = String::new();

        {
            let mut nested = f.nested(&mut body);
            if !self.imports.is_empty() {
                fmt!(&mut nested, "WITH " Comma(self.imports) "\n");
            }
            self.body.to_cypher(&mut nested);
        }

        f.dst.push_str("{\n");
        for line in body.lines() {
            if !line.is_empty() {
                f.dst.push_str(INDENT);
            }
            f.dst.push_str(line);
            f.dst.push('\n');
        }
        f.dst.push('}');
    }
}

/// Lines of a `SET` list. A single item stays on the clause line, several
/// items go one per indented line.
pub(super) struct Lines<L>(pub(super) L);

impl<L> ToCypher for Lines<L>
where
    L: IntoIterator,
    L::IntoIter: ExactSizeIterator,
    L::Item: ToCypher,
{
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let items = self.0.into_iter();

        if items.len() == 1 {
            for item in items {
                fmt!(f, " " item);
            }
            return;
        }

        let mut s = "\n";
        for item in items {
            fmt!(f, s INDENT item);
            s = ",\n";
        }
    }
}
