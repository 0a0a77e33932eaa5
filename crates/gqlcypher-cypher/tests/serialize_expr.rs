use gqlcypher_core::{
    stmt::{Expr, Match, NodePattern, ParamTable, Quantifier, Value},
    Environment,
};
use gqlcypher_cypher::Serializer;
use pretty_assertions::assert_eq;

fn render(env: &Environment, expr: &Expr) -> String {
    Serializer::new(env).serialize_expr(expr, &mut ParamTable::new())
}

#[test]
fn connectives_nest_with_parentheses() {
    let mut env = Environment::new();
    let this = env.variable("this");

    let expr = Expr::and(
        Expr::or(
            Expr::eq(this.property("a"), 1),
            Expr::eq(this.property("b"), 2),
        ),
        Expr::not(Expr::is_null(this.property("c"))),
    );

    assert_eq!(
        render(&env, &expr),
        "(this.a = 1 OR this.b = 2) AND NOT (this.c IS NULL)"
    );
}

#[test]
fn literals() {
    let env = Environment::new();

    assert_eq!(render(&env, &Expr::null()), "NULL");
    assert_eq!(render(&env, &Expr::value(1.0)), "1.0");
    assert_eq!(render(&env, &Expr::value("say \"hi\"")), r#""say \"hi\"""#);
    assert_eq!(
        render(
            &env,
            &Expr::value(Value::List(vec![Value::from(1), Value::from(true)]))
        ),
        "[1, true]"
    );
    assert_eq!(render(&env, &Expr::map::<&str>([])), "{}");
}

#[test]
fn identifiers_are_escaped() {
    let mut env = Environment::new();
    let this = env.variable("this");

    assert_eq!(
        render(&env, &this.property("first name")),
        "this.`first name`"
    );
    assert_eq!(
        render(&env, &Expr::has_labels(&this, ["Movie".to_string(), "Old-Film".to_string()])),
        "this:Movie:`Old-Film`"
    );
}

#[test]
fn exists_subquery() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let other = env.variable("this0");

    let exists = Expr::exists(Match::new(NodePattern::new(&other).label("Genre")));
    let expr = Expr::and(Expr::eq(this.property("x"), 1), exists);

    assert_eq!(
        render(&env, &expr),
        "this.x = 1 AND EXISTS {\n    MATCH (this0:Genre)\n}"
    );
}

#[test]
fn list_functions() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let role = env.variable("role");
    let jwt = env.param("jwt", Value::Null);

    let any = Expr::list_predicate(
        Quantifier::Any,
        &role,
        jwt.property("roles"),
        Expr::in_list(&role, Expr::value(Value::from(vec!["admin"]))),
    );
    assert_eq!(
        render(&env, &any),
        r#"any(role IN $jwt.roles WHERE role IN ["admin"])"#
    );

    let slice = Expr::slice(this.property("tags"), None, Some(Expr::from(-1)));
    assert_eq!(render(&env, &slice), "this.tags[..-1]");

    let count = Expr::func_distinct("count", [Expr::from(&this)]);
    assert_eq!(render(&env, &count), "count(DISTINCT this)");
}
