mod support;

use gqlcypher::{
    schema::{Entity, Field, Interface, Relationship, Scalar, Union},
    stmt::Value,
    Context, Operation, Request, ResolveTree, Schema,
};
use serde_json::json;

/// Actors and the productions they acted in, movies declared before series.
fn productions() -> Schema {
    Schema::builder()
        .interface(Interface::new("Production").field(Field::primitive("title", Scalar::String)))
        .entity(
            Entity::new("Movie")
                .implements("Production")
                .field(Field::primitive("title", Scalar::String))
                .field(Field::primitive("runtime", Scalar::Int)),
        )
        .entity(
            Entity::new("Series")
                .implements("Production")
                .field(Field::primitive("title", Scalar::String))
                .field(Field::primitive("episodes", Scalar::Int)),
        )
        .entity(
            Entity::new("Actor")
                .field(Field::primitive("name", Scalar::String))
                .field(Field::interface(
                    "actedIn",
                    Relationship::outgoing("ACTED_IN", "Production"),
                )),
        )
        .build()
        .unwrap()
}

/// Shelves holding books and films.
fn shelves() -> Schema {
    Schema::builder()
        .entity(Entity::new("Book").field(Field::primitive("title", Scalar::String)))
        .entity(Entity::new("Film").field(Field::primitive("title", Scalar::String)))
        .union(Union::new("Item", ["Book", "Film"]))
        .entity(
            Entity::new("Shelf")
                .field(Field::primitive("name", Scalar::String))
                .field(Field::union("items", Relationship::outgoing("HOLDS", "Item"))),
        )
        .build()
        .unwrap()
}

/// The text of each `UNION` branch, in order. The first and last branches
/// carry the surrounding statement text.
fn branches(cypher: &str) -> Vec<String> {
    let mut branches = vec![String::new()];
    for line in cypher.lines() {
        if line.trim() == "UNION" {
            branches.push(String::new());
        } else if let Some(branch) = branches.last_mut() {
            branch.push_str(line);
            branch.push('\n');
        }
    }
    branches
}

fn actors(acted_in: ResolveTree) -> Request {
    Request::new(
        Operation::Read,
        "Actor",
        ResolveTree::new("actors")
            .field("Actor", ResolveTree::new("name"))
            .field("Actor", acted_in.field("Production", ResolveTree::new("title"))),
    )
}

fn shelf_items(items: ResolveTree) -> Request {
    Request::new(
        Operation::Read,
        "Shelf",
        ResolveTree::new("shelves").field(
            "Shelf",
            items
                .field("Book", ResolveTree::new("title"))
                .field("Film", ResolveTree::new("title")),
        ),
    )
}

#[test]
fn interface_branches_follow_declaration_order() {
    let request = actors(ResolveTree::new("actedIn"));
    let query = support::compile(productions(), &request, &Context::anonymous()).unwrap();

    let branches = branches(&query.cypher);
    assert_eq!(branches.len(), 2, "{}", query.cypher);

    assert!(branches[0].contains("-[:ACTED_IN]->(this0:Movie)"), "{}", query.cypher);
    assert!(branches[0].contains("__resolveType: \"Movie\""), "{}", query.cypher);
    assert!(branches[1].contains("-[:ACTED_IN]->(this1:Series)"), "{}", query.cypher);
    assert!(branches[1].contains("__resolveType: \"Series\""), "{}", query.cypher);
}

#[test]
fn interface_on_filter_reaches_only_its_branch() {
    let request = actors(ResolveTree::new("actedIn").arg(
        "where",
        json!({ "title": "Matrix", "_on": { "Movie": { "runtime_GT": 100 } } }),
    ));
    let query = support::compile(productions(), &request, &Context::anonymous()).unwrap();

    let branches = branches(&query.cypher);
    assert_eq!(branches.len(), 2, "{}", query.cypher);

    assert!(branches[0].contains("this0.title = $"), "{}", query.cypher);
    assert!(branches[0].contains("this0.runtime > $"), "{}", query.cypher);
    assert!(branches[1].contains("this1.title = $"), "{}", query.cypher);
    assert!(!branches[1].contains("runtime"), "{}", query.cypher);
    assert!(query.params.iter().any(|(_, value)| *value == Value::Int(100)));
}

#[test]
fn interface_on_alone_drops_other_implementations() {
    let request = actors(
        ResolveTree::new("actedIn").arg("where", json!({ "_on": { "Series": { "episodes_GT": 10 } } })),
    );
    let query = support::compile(productions(), &request, &Context::anonymous()).unwrap();

    assert_eq!(branches(&query.cypher).len(), 1, "{}", query.cypher);
    assert!(!query.cypher.contains(":Movie)"), "{}", query.cypher);
    assert!(query.cypher.contains(":Series)"), "{}", query.cypher);
}

#[test]
fn interface_on_rejects_other_types() {
    let request = actors(
        ResolveTree::new("actedIn").arg("where", json!({ "_on": { "Actor": { "name": "K" } } })),
    );
    let err = support::compile(productions(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn union_where_drops_unlisted_members() {
    let request = shelf_items(ResolveTree::new("items").arg("where", json!({ "Film": { "title": "Alien" } })));
    let query = support::compile(shelves(), &request, &Context::anonymous()).unwrap();

    assert_eq!(branches(&query.cypher).len(), 1, "{}", query.cypher);
    assert!(!query.cypher.contains(":Book)"), "{}", query.cypher);
    assert!(query.cypher.contains("-[:HOLDS]->("), "{}", query.cypher);
    assert!(query.cypher.contains(":Film)"), "{}", query.cypher);
    assert!(query.cypher.contains("__resolveType: \"Film\""), "{}", query.cypher);
    assert!(query.params.iter().any(|(_, value)| *value == Value::from("Alien")));
}

#[test]
fn union_without_where_selects_every_member() {
    let query = support::compile(
        shelves(),
        &shelf_items(ResolveTree::new("items")),
        &Context::anonymous(),
    )
    .unwrap();

    let book = query.cypher.find(":Book)").expect("book branch");
    let film = query.cypher.find(":Film)").expect("film branch");
    assert!(book < film, "{}", query.cypher);
    assert_eq!(branches(&query.cypher).len(), 2, "{}", query.cypher);
}

#[test]
fn union_where_rejects_non_members() {
    let request = shelf_items(ResolveTree::new("items").arg("where", json!({ "Shelf": {} })));
    let err = support::compile(shelves(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn union_fields_cannot_be_sorted() {
    let request = shelf_items(
        ResolveTree::new("items").arg("options", json!({ "sort": [{ "title": "ASC" }] })),
    );
    let err = support::compile(shelves(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}
