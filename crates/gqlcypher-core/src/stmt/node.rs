use super::Visit;

/// An AST node that can be walked by a [`Visit`] implementation.
pub trait Node {
    fn visit<V: Visit>(&self, visit: V);
}

impl<T: Node> Node for Option<T> {
    fn visit<V: Visit>(&self, visit: V) {
        if let Some(node) = self {
            node.visit(visit);
        }
    }
}

impl<T: Node> Node for &T {
    fn visit<V: Visit>(&self, visit: V) {
        (**self).visit(visit);
    }
}
