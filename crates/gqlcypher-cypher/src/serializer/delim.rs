use super::{Formatter, Params, ToCypher};

/// Comma delimited
pub(super) struct Comma<L>(pub(super) L);

/// Delimited by an arbitrary separator
pub(super) struct Delimited<L>(pub(super) L, pub(super) &'static str);

impl<L> ToCypher for Comma<L>
where
    L: IntoIterator,
    L::Item: ToCypher,
{
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        Delimited(self.0, ", ").to_cypher(f);
    }
}

impl<L> ToCypher for Delimited<L>
where
    L: IntoIterator,
    L::Item: ToCypher,
{
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut s = "";
        for i in self.0 {
            fmt!(f, s i);
            s = self.1;
        }
    }
}
