mod support;

use gqlcypher::{driver::AccessMode, stmt::Value, Context, Operation, Request, ResolveTree};
use pretty_assertions::assert_eq;
use serde_json::json;

fn movies_payload(root: &str) -> ResolveTree {
    ResolveTree::new(root).field(
        "MoviesMutationResponse",
        ResolveTree::new("movies").field("Movie", ResolveTree::new("title")),
    )
}

fn admin() -> Context {
    Context::authenticated(json!({ "sub": "admin-1", "roles": ["admin"] }))
}

fn has_param(params: &gqlcypher::stmt::ParamTable, value: &str) -> bool {
    params.iter().any(|(_, param)| *param == Value::from(value))
}

#[test]
fn create_runs_one_subquery_per_input() {
    let request = Request::new(
        Operation::Create,
        "Movie",
        movies_payload("createMovies").arg("input", json!([{ "title": "A" }, { "title": "B" }])),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    assert_eq!(query.cypher.matches("CREATE (").count(), 2, "{}", query.cypher);
    assert_eq!(query.cypher.matches("CALL {").count(), 2, "{}", query.cypher);
    assert!(query.cypher.ends_with("AS data"), "{}", query.cypher);
    assert!(has_param(&query.params, "A"));
    assert!(has_param(&query.params, "B"));
    assert_eq!(query.access_mode, AccessMode::Write);
}

#[test]
fn create_requires_input() {
    let request = Request::new(Operation::Create, "Movie", movies_payload("createMovies"));
    let err = support::compile(support::movies(), &request, &admin()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn nested_create_links_the_new_node() {
    let request = Request::new(
        Operation::Create,
        "Movie",
        movies_payload("createMovies").arg(
            "input",
            json!([{
                "title": "The Matrix",
                "actors": {
                    "create": [{ "node": { "name": "Keanu" }, "edge": { "role": "Neo" } }]
                }
            }]),
        ),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    assert!(query.cypher.contains("CREATE (this0:Actor)"), "{}", query.cypher);
    assert!(query.cypher.contains(":ACTED_IN]-"), "{}", query.cypher);
    assert!(has_param(&query.params, "Keanu"));
    assert!(has_param(&query.params, "Neo"));
}

#[test]
fn update_sets_matched_nodes() {
    let request = Request::new(
        Operation::Update,
        "Movie",
        movies_payload("updateMovies")
            .arg("where", json!({ "title": "A" }))
            .arg("update", json!({ "title": "B", "released": null })),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    assert!(
        query.cypher.starts_with("MATCH (this:Movie)\nWHERE this.title = $this_title\nSET this.title = $"),
        "{}",
        query.cypher
    );
    assert!(query.cypher.contains("this.released = NULL") || query.cypher.contains("REMOVE this.released"));
    assert!(
        query.cypher.ends_with("RETURN collect(DISTINCT this { .title }) AS data"),
        "{}",
        query.cypher
    );
    assert!(has_param(&query.params, "A"));
    assert!(has_param(&query.params, "B"));
}

#[test]
fn update_connects_related_nodes() {
    let request = Request::new(
        Operation::Update,
        "Movie",
        movies_payload("updateMovies")
            .arg("where", json!({ "title": "A" }))
            .arg("connect", json!({ "genres": [{ "where": { "node": { "name": "Action" } } }] })),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    let merge = query.cypher.find("MERGE (this)-[:IN_GENRE]->").expect("merge");
    let assertion = query.cypher.find("apoc.util.validatePredicate").expect("assertion");
    assert!(assertion < merge, "{}", query.cypher);
    assert!(has_param(&query.params, "Action"));
}

#[test]
fn update_disconnects_related_nodes() {
    let request = Request::new(
        Operation::Update,
        "Movie",
        movies_payload("updateMovies")
            .arg("disconnect", json!({ "actors": [{ "where": { "node": { "name": "Keanu" } } }] })),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    assert!(query.cypher.contains("OPTIONAL MATCH") || query.cypher.contains("MATCH (this)<-["), "{}", query.cypher);
    assert!(query.cypher.contains("\n    DELETE "), "{}", query.cypher);
    assert!(!query.cypher.contains("DETACH DELETE"), "{}", query.cypher);
}

#[test]
fn nested_update_edge_needs_properties() {
    let request = Request::new(
        Operation::Update,
        "Movie",
        movies_payload("updateMovies").arg(
            "update",
            json!({ "genres": [{ "update": { "edge": { "weight": 1 } } }] }),
        ),
    );
    let err = support::compile(support::movies(), &request, &admin()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn nested_update_rejects_on_outside_interfaces() {
    let request = Request::new(
        Operation::Update,
        "Movie",
        movies_payload("updateMovies").arg(
            "update",
            json!({ "actors": [{ "update": { "node": { "_on": { "Actor": { "name": "K" } } } } }] }),
        ),
    );
    let err = support::compile(support::movies(), &request, &admin()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn nested_update_writes_node_and_edge() {
    let request = Request::new(
        Operation::Update,
        "Movie",
        movies_payload("updateMovies").arg(
            "update",
            json!({
                "actors": [{
                    "where": { "node": { "name": "Keanu" } },
                    "update": { "node": { "name": "Keanu Reeves" }, "edge": { "role": "Neo" } }
                }]
            }),
        ),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    assert!(query.cypher.contains("CALL {\n    WITH this"), "{}", query.cypher);
    assert!(query.cypher.contains("<-[edge:ACTED_IN]-"), "{}", query.cypher);
    assert!(query.cypher.contains("edge.role = $"), "{}", query.cypher);
    assert!(has_param(&query.params, "Keanu Reeves"));
    assert!(has_param(&query.params, "Neo"));
}

#[test]
fn delete_detaches_matched_nodes() {
    let request = Request::new(
        Operation::Delete,
        "Movie",
        ResolveTree::new("deleteMovies").arg("where", json!({ "title": "A" })),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Movie)\nWHERE this.title = $this_title\nDETACH DELETE this"
    );
    assert_eq!(query.access_mode, AccessMode::Write);
}

#[test]
fn delete_cascades_collect_before_deleting() {
    let request = Request::new(
        Operation::Delete,
        "Movie",
        ResolveTree::new("deleteMovies")
            .arg("where", json!({ "title": "A" }))
            .arg("delete", json!({ "actors": [{ "where": { "node": { "name": "Keanu" } } }] })),
    );
    let query = support::compile(support::movies(), &request, &admin()).unwrap();

    let call = query.cypher.find("CALL {").expect("cascade");
    let unwind = query.cypher.find("UNWIND ").expect("unwind");
    assert!(call < unwind, "{}", query.cypher);
    assert!(query.cypher.contains("collect(DISTINCT this)"), "{}", query.cypher);
    assert!(query.cypher.contains("reduce("), "{}", query.cypher);
    assert!(query.cypher.ends_with("DETACH DELETE x"), "{}", query.cypher);
}

#[test]
fn delete_rejects_unknown_relationships() {
    let request = Request::new(
        Operation::Delete,
        "Movie",
        ResolveTree::new("deleteMovies").arg("delete", json!({ "title": [] })),
    );
    let err = support::compile(support::movies(), &request, &admin()).unwrap_err();
    assert!(err.is_invalid_request());
}
