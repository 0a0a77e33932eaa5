use gqlcypher_core::{
    stmt::{
        Call, Clause, Create, Direction, Expr, Filterable, MapProjectionItem, Match, Merge,
        NodePattern, Orderable, Pattern, Projection, RelationshipPattern, Return, Set, SetItem,
        SortDirection, Statement, Union, Value, With,
    },
    Environment,
};
use gqlcypher_cypher::Serializer;
use pretty_assertions::assert_eq;

#[test]
fn match_with_filter_and_projection() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let title = env.param("param0", "The Matrix");

    let mut stmt = Statement::new();
    stmt.push(
        Match::new(NodePattern::new(&this).label("Movie"))
            .filter(Expr::eq(this.property("title"), &title)),
    );
    stmt.push(Return::new(Projection::default().item(
        Expr::map_projection(&this, [MapProjectionItem::Property("title".into())]),
        &this,
    )));

    let rendered = Serializer::new(&env).serialize(&stmt);

    assert_eq!(
        rendered.cypher,
        "MATCH (this:Movie)\nWHERE this.title = $param0\nRETURN this { .title } AS this"
    );
    assert_eq!(rendered.params.get("param0"), Some(&Value::from("The Matrix")));
}

#[test]
fn only_referenced_params_are_emitted() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let _unused = env.param("unused", 1);
    let used = env.param("used", 2);

    let stmt = Statement::from(
        Match::new(NodePattern::new(&this)).filter(Expr::gt(this.property("n"), &used)),
    );

    let serializer = Serializer::new(&env);
    let first = serializer.serialize(&stmt);
    let second = serializer.serialize(&stmt);

    assert_eq!(first.params.names().collect::<Vec<_>>(), ["used"]);
    assert_eq!(first, second);
}

#[test]
fn call_subquery_is_indented() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let actor = env.variable("this0");
    let var = env.variable("var1");

    let mut body = Statement::new();
    body.push(Match::new(
        Pattern::node(NodePattern::new(&this)).related(
            RelationshipPattern::new(Direction::Incoming).rel_type("ACTED_IN"),
            NodePattern::new(&actor).label("Actor"),
        ),
    ));
    body.push(With::new(Projection::default().item(
        Expr::map_projection(&actor, [MapProjectionItem::Property("name".into())]),
        &actor,
    )));
    body.push(Return::new(
        Projection::default().item(Expr::collect(&actor), &var),
    ));

    let mut stmt = Statement::new();
    stmt.push(Match::new(NodePattern::new(&this).label("Movie")));
    stmt.push(Call::new([&this], body));

    let rendered = Serializer::new(&env).serialize(&stmt);

    assert_eq!(
        rendered.cypher,
        "MATCH (this:Movie)
CALL {
    WITH this
    MATCH (this)<-[:ACTED_IN]-(this0:Actor)
    WITH this0 { .name } AS this0
    RETURN collect(this0) AS var1
}"
    );
}

#[test]
fn set_lists_break_over_lines() {
    let mut env = Environment::new();
    let this = env.variable("this0");
    let id = env.param("this0_id", "1");
    let name = env.param("this0_name", "Keanu");

    let mut stmt = Statement::new();
    stmt.push(Create::new(NodePattern::new(&this).label("Actor")));
    stmt.push(Set::new([
        SetItem::new(this.property("id"), &id),
        SetItem::new(this.property("name"), &name),
    ]));
    stmt.push(Set::new([SetItem::new(
        this.property("updatedAt"),
        Expr::func("datetime", []),
    )]));

    let rendered = Serializer::new(&env).serialize(&stmt);

    assert_eq!(
        rendered.cypher,
        "CREATE (this0:Actor)
SET
    this0.id = $this0_id,
    this0.name = $this0_name
SET this0.updatedAt = datetime()"
    );
}

#[test]
fn merge_with_on_create() {
    let mut env = Environment::new();
    let node = env.variable("this0_node");
    let id = env.param("this0_node_id", "m1");

    let stmt = Statement::from(Clause::from(
        Merge::new(NodePattern::new(&node).label("Movie").property("id", &id))
            .on_create([SetItem::new(node.property("id"), &id)]),
    ));

    let rendered = Serializer::new(&env).serialize(&stmt);

    assert_eq!(
        rendered.cypher,
        "MERGE (this0_node:Movie { id: $this0_node_id })\nON CREATE SET this0_node.id = $this0_node_id"
    );
    assert_eq!(rendered.params.len(), 1);
}

#[test]
fn ordering_follows_projection() {
    let mut env = Environment::new();
    let this = env.variable("this");
    let limit = env.param("this_limit", 10);

    let mut with = With::new(Projection::variables([&this]));
    with.order_by(this.property("title"), SortDirection::Desc);
    with.limit(&limit);

    let stmt = Statement::from(Clause::from(with));
    let rendered = Serializer::new(&env).serialize(&stmt);

    assert_eq!(
        rendered.cypher,
        "WITH this\nORDER BY this.title DESC\nLIMIT $this_limit"
    );
}

#[test]
fn union_branches() {
    let mut env = Environment::new();
    let a = env.variable("this0");
    let b = env.variable("this1");
    let out = env.variable("var2");

    let branch = |var: &gqlcypher_core::stmt::Variable, label: &str| {
        let mut stmt = Statement::new();
        stmt.push(Match::new(NodePattern::new(var).label(label)));
        stmt.push(With::new(Projection::default().item(var, &out)));
        stmt.push(Return::new(Projection::variables([&out])));
        stmt
    };

    let stmt = Statement::from(Clause::from(Union {
        all: false,
        branches: vec![branch(&a, "Movie"), branch(&b, "Series")],
    }));

    let rendered = Serializer::new(&env).serialize(&stmt);

    assert_eq!(
        rendered.cypher,
        "MATCH (this0:Movie)
WITH this0 AS var2
RETURN var2
UNION
MATCH (this1:Series)
WITH this1 AS var2
RETURN var2"
    );
}
