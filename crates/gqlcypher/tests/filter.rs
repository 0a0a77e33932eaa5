mod support;

use gqlcypher::{stmt::Value, Context, Operation, Request, ResolveTree};
use pretty_assertions::assert_eq;
use serde_json::json;

fn posts(filter: serde_json::Value) -> Request {
    Request::new(
        Operation::Read,
        "Post",
        ResolveTree::new("posts")
            .arg("where", filter)
            .field("Post", ResolveTree::new("content")),
    )
}

fn movies(filter: serde_json::Value) -> Request {
    Request::new(
        Operation::Read,
        "Movie",
        ResolveTree::new("movies")
            .arg("where", filter)
            .field("Movie", ResolveTree::new("title")),
    )
}

#[test]
fn count_aggregate_filter() {
    let request = posts(json!({ "likesAggregate": { "count_GT": 10 } }));
    let query = support::compile(support::posts(), &request, &Context::anonymous()).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Post)\n\
         WHERE EXISTS {\n    \
             MATCH (this)<-[:LIKES]-(this0:User)\n    \
             WITH count(this0) AS var\n    \
             WHERE var > $this0_count_GT\n\
         }\n\
         RETURN this { .content } AS this"
    );
    assert_eq!(query.params.len(), 1);
    assert_eq!(query.params.get("this0_count_GT"), Some(&Value::Int(10)));
}

#[test]
fn aggregate_filter_requires_an_operator() {
    let request = posts(json!({ "likesAggregate": { "count": "many" } }));
    let err = support::compile(support::posts(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn relationship_quantifiers() {
    let cx = Context::anonymous();

    let some = support::compile(
        support::movies(),
        &movies(json!({ "genres_SOME": { "name": "Drama" } })),
        &cx,
    )
    .unwrap();
    assert!(some.cypher.contains("WHERE EXISTS {"), "{}", some.cypher);
    assert!(!some.cypher.contains("NOT ("), "{}", some.cypher);

    let none = support::compile(
        support::movies(),
        &movies(json!({ "genres_NONE": { "name": "Drama" } })),
        &cx,
    )
    .unwrap();
    assert!(none.cypher.contains("WHERE NOT (EXISTS {"), "{}", none.cypher);

    let single = support::compile(
        support::movies(),
        &movies(json!({ "genres_SINGLE": { "name": "Drama" } })),
        &cx,
    )
    .unwrap();
    assert!(single.cypher.contains("COUNT {"), "{}", single.cypher);
    assert!(single.cypher.contains("} = 1"), "{}", single.cypher);
}

#[test]
fn all_quantifier_negates_the_inner_filter() {
    let request = movies(json!({ "genres_ALL": { "name": "Drama" } }));
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert!(query.cypher.contains("NOT (EXISTS {"), "{}", query.cypher);
    assert!(query.cypher.contains("NOT (this0.name = $"), "{}", query.cypher);
}

#[test]
fn connection_filter_reaches_edge_properties() {
    let request = movies(json!({
        "actorsConnection_SOME": { "edge": { "role": "Neo" } }
    }));
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert!(query.cypher.contains("<-[edge:ACTED_IN]-"), "{}", query.cypher);
    assert!(query.cypher.contains("edge.role = $"), "{}", query.cypher);
    assert!(query.params.iter().any(|(_, value)| *value == Value::from("Neo")));
}

#[test]
fn connection_filter_rejects_unknown_keys() {
    let request = movies(json!({ "actorsConnection_SOME": { "relationship": {} } }));
    let err = support::compile(support::movies(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn logical_operators_combine_filters() {
    let request = movies(json!({
        "OR": [{ "title": "Matrix" }, { "released_GTE": 2000 }]
    }));
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert!(query.cypher.contains(" OR "), "{}", query.cypher);
    assert!(query.cypher.contains("this.released >= $"), "{}", query.cypher);
}

#[test]
fn string_operators_expect_strings() {
    let request = movies(json!({ "title_CONTAINS": 42 }));
    let err = support::compile(support::movies(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}
