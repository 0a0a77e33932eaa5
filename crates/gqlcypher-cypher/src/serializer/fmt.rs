use super::{Formatter, Params};

macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $fragments.to_cypher($f);
        )*
    }};
}

pub(super) trait ToCypher {
    fn to_cypher<T: Params>(self, f: &mut Formatter<'_, T>);
}

impl ToCypher for &str {
    fn to_cypher<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push_str(self);
    }
}

impl ToCypher for &String {
    fn to_cypher<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push_str(self);
    }
}

impl<I: ToCypher> ToCypher for Option<I> {
    fn to_cypher<T: Params>(self, f: &mut Formatter<'_, T>) {
        if let Some(inner) = self {
            inner.to_cypher(f);
        }
    }
}
