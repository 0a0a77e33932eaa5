use gqlcypher_core::stmt::{visit, Expr, Match, NodePattern, Statement};
use gqlcypher_core::Environment;
use pretty_assertions::assert_eq;

#[test]
fn and_flattens_and_keeps_order() {
    let mut env = Environment::new();
    let a = Expr::eq(env.variable("a"), 1);
    let b = Expr::eq(env.variable("b"), 2);
    let c = Expr::eq(env.variable("c"), 3);

    let expr = Expr::and(Expr::and(a.clone(), b.clone()), c.clone());
    let Expr::And(and) = expr else {
        panic!("expected AND");
    };
    assert_eq!(and.operands, vec![a.clone(), b.clone(), c.clone()]);

    let expr = Expr::and(a.clone(), Expr::and(b.clone(), c.clone()));
    let Expr::And(and) = expr else {
        panic!("expected AND");
    };
    assert_eq!(and.operands, vec![a, b, c]);
}

#[test]
fn absent_predicates_are_dropped() {
    let mut env = Environment::new();
    let a = Expr::eq(env.variable("a"), 1);

    assert_eq!(Expr::and_all([None, Some(a.clone()), None]), Some(a.clone()));
    assert_eq!(Expr::and_all(Vec::<Option<Expr>>::new()), None);
    assert_eq!(Expr::or_any([None::<Expr>, None]), None);
}

#[test]
fn double_negation_unwraps() {
    let mut env = Environment::new();
    let a = Expr::is_null(env.variable("a"));
    assert_eq!(Expr::not(Expr::not(a.clone())), a);
}

#[test]
fn visit_finds_params_inside_subqueries() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let other = env.variable("other");
    let param = env.param("name", "x");

    let inner = Match::new(NodePattern::new(&other).label("Actor"));
    let exists = Expr::exists(Statement::from(gqlcypher_core::stmt::Clause::from(
        gqlcypher_core::stmt::Match {
            predicate: Some(Expr::eq(other.property("name"), &param)),
            ..inner
        },
    )));

    let stmt = Statement::from(Match {
        predicate: Some(exists),
        ..Match::new(NodePattern::new(&this).label("Movie"))
    });

    let mut params = vec![];
    visit::for_each_param(&stmt, |param| params.push(param.name().to_string()));
    assert_eq!(params, ["name"]);
}
