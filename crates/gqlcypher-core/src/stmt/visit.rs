#![allow(unused_variables)]

use super::{
    Call, Clause, Expr, Match, Node, NodePattern, Param, Pattern, Projection, RelationshipPattern,
    SetItem, Statement, Variable,
};

pub trait Visit {
    fn visit<N: Node>(&mut self, i: &N)
    where
        Self: Sized,
    {
        i.visit(self);
    }

    fn visit_statement(&mut self, i: &Statement) {
        visit_statement(self, i);
    }

    fn visit_clause(&mut self, i: &Clause) {
        visit_clause(self, i);
    }

    fn visit_call(&mut self, i: &Call) {
        visit_call(self, i);
    }

    fn visit_match(&mut self, i: &Match) {
        visit_match(self, i);
    }

    fn visit_expr(&mut self, i: &Expr) {
        visit_expr(self, i);
    }

    fn visit_pattern(&mut self, i: &Pattern) {
        visit_pattern(self, i);
    }

    fn visit_node_pattern(&mut self, i: &NodePattern) {
        visit_node_pattern(self, i);
    }

    fn visit_relationship_pattern(&mut self, i: &RelationshipPattern) {
        visit_relationship_pattern(self, i);
    }

    fn visit_projection(&mut self, i: &Projection) {
        visit_projection(self, i);
    }

    fn visit_set_item(&mut self, i: &SetItem) {
        visit_set_item(self, i);
    }

    fn visit_variable(&mut self, i: &Variable) {}

    fn visit_param(&mut self, i: &Param) {}
}

impl<V: Visit> Visit for &mut V {
    fn visit_statement(&mut self, i: &Statement) {
        Visit::visit_statement(&mut **self, i);
    }

    fn visit_clause(&mut self, i: &Clause) {
        Visit::visit_clause(&mut **self, i);
    }

    fn visit_call(&mut self, i: &Call) {
        Visit::visit_call(&mut **self, i);
    }

    fn visit_match(&mut self, i: &Match) {
        Visit::visit_match(&mut **self, i);
    }

    fn visit_expr(&mut self, i: &Expr) {
        Visit::visit_expr(&mut **self, i);
    }

    fn visit_pattern(&mut self, i: &Pattern) {
        Visit::visit_pattern(&mut **self, i);
    }

    fn visit_node_pattern(&mut self, i: &NodePattern) {
        Visit::visit_node_pattern(&mut **self, i);
    }

    fn visit_relationship_pattern(&mut self, i: &RelationshipPattern) {
        Visit::visit_relationship_pattern(&mut **self, i);
    }

    fn visit_projection(&mut self, i: &Projection) {
        Visit::visit_projection(&mut **self, i);
    }

    fn visit_set_item(&mut self, i: &SetItem) {
        Visit::visit_set_item(&mut **self, i);
    }

    fn visit_variable(&mut self, i: &Variable) {
        Visit::visit_variable(&mut **self, i);
    }

    fn visit_param(&mut self, i: &Param) {
        Visit::visit_param(&mut **self, i);
    }
}

pub fn visit_statement<V>(v: &mut V, node: &Statement)
where
    V: Visit + ?Sized,
{
    for clause in &node.clauses {
        v.visit_clause(clause);
    }
}

pub fn visit_clause<V>(v: &mut V, node: &Clause)
where
    V: Visit + ?Sized,
{
    match node {
        Clause::Match(clause) => v.visit_match(clause),
        Clause::Create(clause) => v.visit_pattern(&clause.pattern),
        Clause::Merge(clause) => {
            v.visit_pattern(&clause.pattern);
            for item in clause.on_create.iter().chain(&clause.on_match) {
                v.visit_set_item(item);
            }
        }
        Clause::Set(clause) => {
            for item in &clause.items {
                v.visit_set_item(item);
            }
        }
        Clause::Remove(clause) => {
            for expr in &clause.items {
                v.visit_expr(expr);
            }
        }
        Clause::Delete(clause) => {
            for expr in &clause.items {
                v.visit_expr(expr);
            }
        }
        Clause::With(clause) => {
            v.visit_projection(&clause.projection);
            for item in &clause.ordering.order_by {
                v.visit_expr(&item.expr);
            }
            if let Some(expr) = &clause.ordering.skip {
                v.visit_expr(expr);
            }
            if let Some(expr) = &clause.ordering.limit {
                v.visit_expr(expr);
            }
            if let Some(expr) = &clause.predicate {
                v.visit_expr(expr);
            }
        }
        Clause::Return(clause) => {
            v.visit_projection(&clause.projection);
            for item in &clause.ordering.order_by {
                v.visit_expr(&item.expr);
            }
            if let Some(expr) = &clause.ordering.skip {
                v.visit_expr(expr);
            }
            if let Some(expr) = &clause.ordering.limit {
                v.visit_expr(expr);
            }
        }
        Clause::Unwind(clause) => {
            v.visit_expr(&clause.expr);
            v.visit_variable(&clause.alias);
        }
        Clause::Call(clause) => v.visit_call(clause),
        Clause::Union(clause) => {
            for branch in &clause.branches {
                v.visit_statement(branch);
            }
        }
        Clause::Raw(_) => {}
    }
}

pub fn visit_call<V>(v: &mut V, node: &Call)
where
    V: Visit + ?Sized,
{
    for var in &node.imports {
        v.visit_variable(var);
    }
    v.visit_statement(&node.body);
}

pub fn visit_match<V>(v: &mut V, node: &Match)
where
    V: Visit + ?Sized,
{
    v.visit_pattern(&node.pattern);
    if let Some(expr) = &node.predicate {
        v.visit_expr(expr);
    }
}

pub fn visit_pattern<V>(v: &mut V, node: &Pattern)
where
    V: Visit + ?Sized,
{
    v.visit_node_pattern(&node.start);
    for step in &node.steps {
        v.visit_relationship_pattern(&step.relationship);
        v.visit_node_pattern(&step.node);
    }
}

pub fn visit_node_pattern<V>(v: &mut V, node: &NodePattern)
where
    V: Visit + ?Sized,
{
    if let Some(var) = &node.variable {
        v.visit_variable(var);
    }
    for (_, expr) in &node.properties {
        v.visit_expr(expr);
    }
}

pub fn visit_relationship_pattern<V>(v: &mut V, node: &RelationshipPattern)
where
    V: Visit + ?Sized,
{
    if let Some(var) = &node.variable {
        v.visit_variable(var);
    }
    for (_, expr) in &node.properties {
        v.visit_expr(expr);
    }
}

pub fn visit_projection<V>(v: &mut V, node: &Projection)
where
    V: Visit + ?Sized,
{
    for item in &node.items {
        v.visit_expr(&item.expr);
        if let Some(alias) = &item.alias {
            v.visit_variable(alias);
        }
    }
}

pub fn visit_set_item<V>(v: &mut V, node: &SetItem)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.target);
    v.visit_expr(&node.value);
}

pub fn visit_expr<V>(v: &mut V, node: &Expr)
where
    V: Visit + ?Sized,
{
    match node {
        Expr::And(expr) => {
            for operand in &expr.operands {
                v.visit_expr(operand);
            }
        }
        Expr::Or(expr) => {
            for operand in &expr.operands {
                v.visit_expr(operand);
            }
        }
        Expr::Xor(expr) => {
            for operand in &expr.operands {
                v.visit_expr(operand);
            }
        }
        Expr::BinaryOp(expr) => {
            v.visit_expr(&expr.lhs);
            v.visit_expr(&expr.rhs);
        }
        Expr::Case(expr) => {
            for (when, then) in &expr.when {
                v.visit_expr(when);
                v.visit_expr(then);
            }
            if let Some(otherwise) = &expr.otherwise {
                v.visit_expr(otherwise);
            }
        }
        Expr::Count(expr) => v.visit_statement(&expr.subquery),
        Expr::Exists(expr) => v.visit_statement(&expr.subquery),
        Expr::Func(expr) => {
            for arg in &expr.args {
                v.visit_expr(arg);
            }
        }
        Expr::HasLabels(expr) => v.visit_variable(&expr.variable),
        Expr::IsNull(expr) => v.visit_expr(&expr.expr),
        Expr::List(expr) => {
            for item in &expr.items {
                v.visit_expr(item);
            }
        }
        Expr::ListPredicate(expr) => {
            v.visit_variable(&expr.variable);
            v.visit_expr(&expr.list);
            v.visit_expr(&expr.predicate);
        }
        Expr::Map(expr) => {
            for value in expr.entries.values() {
                v.visit_expr(value);
            }
        }
        Expr::MapProjection(expr) => {
            v.visit_variable(&expr.variable);
            for item in &expr.items {
                if let super::MapProjectionItem::Entry(_, value) = item {
                    v.visit_expr(value);
                }
            }
        }
        Expr::Not(expr) => v.visit_expr(&expr.expr),
        Expr::Param(param) => v.visit_param(param),
        Expr::Property(expr) => v.visit_expr(&expr.base),
        Expr::Reduce(expr) => {
            v.visit_variable(&expr.accumulator);
            v.visit_expr(&expr.init);
            v.visit_variable(&expr.variable);
            v.visit_expr(&expr.list);
            v.visit_expr(&expr.expr);
        }
        Expr::Slice(expr) => {
            v.visit_expr(&expr.list);
            if let Some(from) = &expr.from {
                v.visit_expr(from);
            }
            if let Some(to) = &expr.to {
                v.visit_expr(to);
            }
        }
        Expr::Variable(var) => v.visit_variable(var),
        Expr::Raw(_) | Expr::Value(_) => {}
    }
}

pub fn for_each_expr<F>(node: &impl Node, f: F)
where
    F: FnMut(&Expr),
{
    struct ForEach<F> {
        f: F,
    }

    impl<F> Visit for ForEach<F>
    where
        F: FnMut(&Expr),
    {
        fn visit_expr(&mut self, node: &Expr) {
            visit_expr(self, node);
            (self.f)(node);
        }
    }

    node.visit(ForEach { f });
}

/// Calls `f` with every parameter referenced by `node`, in visit order.
pub fn for_each_param<F>(node: &impl Node, f: F)
where
    F: FnMut(&Param),
{
    struct ForEach<F> {
        f: F,
    }

    impl<F> Visit for ForEach<F>
    where
        F: FnMut(&Param),
    {
        fn visit_param(&mut self, node: &Param) {
            (self.f)(node);
        }
    }

    node.visit(ForEach { f });
}

impl Node for Statement {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_statement(self);
    }
}

impl Node for Clause {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_clause(self);
    }
}

impl Node for Expr {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_expr(self);
    }
}
