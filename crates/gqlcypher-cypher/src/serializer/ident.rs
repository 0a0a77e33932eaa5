use super::{Formatter, Params, ToCypher};

/// A name in identifier position. Names that are not plain identifiers are
/// wrapped in backticks.
pub(super) struct Ident<S>(pub(super) S);

/// `:Label`, or `:TYPE` for a relationship
pub(super) struct Label<S>(pub(super) S);

impl<S: AsRef<str>> ToCypher for Ident<S> {
    fn to_cypher<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = self.0.as_ref();

        if is_plain(name) {
            f.dst.push_str(name);
        } else {
            f.dst.push('`');
            f.dst.push_str(&name.replace('`', "``"));
            f.dst.push('`');
        }
    }
}

impl<S: AsRef<str>> ToCypher for Label<S> {
    fn to_cypher<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, ":" Ident(self.0));
    }
}

fn is_plain(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
