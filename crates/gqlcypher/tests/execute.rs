mod support;

use gqlcypher::{
    driver::{AccessMode, Counters, Record, Response},
    stmt::Value,
    Context, Operation, Request, ResolveTree,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::MockExecutor;

fn record(row: serde_json::Value) -> Record {
    match Value::from(row) {
        Value::Map(record) => record,
        other => panic!("not a row: {other:?}"),
    }
}

#[tokio::test]
async fn read_adds_typenames() {
    let executor = MockExecutor::returning(Response::from_records([
        record(json!({ "this": { "name": "A" } })),
        record(json!({ "this": { "name": "B" } })),
    ]));
    let request = Request::new(
        Operation::Read,
        "Movie",
        ResolveTree::new("movies")
            .field("Movie", ResolveTree::new("title").alias("name"))
            .field("Movie", ResolveTree::new("__typename")),
    );

    let compiler = support::compiler(support::movies());
    let value = compiler
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap();

    assert_eq!(
        value,
        Value::from(json!([
            { "name": "A", "__typename": "Movie" },
            { "name": "B", "__typename": "Movie" },
        ]))
    );

    let queries = executor.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].access_mode, AccessMode::Read);
}

#[tokio::test]
async fn read_passes_projected_values_through() {
    let executor = MockExecutor::returning(Response::from_records([record(json!({
        "this": { "title": "A", "genres": [{ "name": "Action" }] }
    }))]));
    let request = Request::new(
        Operation::Read,
        "Movie",
        ResolveTree::new("movies")
            .field("Movie", ResolveTree::new("title"))
            .field(
                "Movie",
                ResolveTree::new("genres").field("Genre", ResolveTree::new("name")),
            ),
    );

    let value = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap();

    assert_eq!(
        value,
        Value::from(json!([{ "title": "A", "genres": [{ "name": "Action" }] }]))
    );
}

#[tokio::test]
async fn connection_gets_cursors_and_page_info() {
    let executor = MockExecutor::returning(Response::from_records([record(json!({
        "this": {
            "edges": [{ "node": { "title": "A" } }, { "node": { "title": "B" } }],
            "totalCount": 3
        }
    }))]));
    let request = Request::new(
        Operation::Connection,
        "Movie",
        ResolveTree::new("moviesConnection")
            .arg("first", 2)
            .field(
                "MoviesConnection",
                ResolveTree::new("edges")
                    .field("MovieEdge", ResolveTree::new("cursor"))
                    .field(
                        "MovieEdge",
                        ResolveTree::new("node").field("Movie", ResolveTree::new("title")),
                    ),
            )
            .field("MoviesConnection", ResolveTree::new("totalCount"))
            .field(
                "MoviesConnection",
                ResolveTree::new("pageInfo")
                    .field("PageInfo", ResolveTree::new("hasNextPage"))
                    .field("PageInfo", ResolveTree::new("hasPreviousPage"))
                    .field("PageInfo", ResolveTree::new("endCursor")),
            ),
    );

    let value = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap();

    assert_eq!(
        value,
        Value::from(json!({
            "edges": [
                { "cursor": "YXJyYXljb25uZWN0aW9uOjA=", "node": { "title": "A" } },
                { "cursor": "YXJyYXljb25uZWN0aW9uOjE=", "node": { "title": "B" } },
            ],
            "totalCount": 3,
            "pageInfo": {
                "hasNextPage": true,
                "hasPreviousPage": false,
                "endCursor": "YXJyYXljb25uZWN0aW9uOjE=",
            },
        }))
    );
}

#[tokio::test]
async fn create_reports_nodes_and_info() {
    let executor = MockExecutor::returning(
        Response::from_records([record(json!({ "data": [{ "title": "A" }] }))]).with_counters(
            Counters {
                nodes_created: 1,
                properties_set: 1,
                ..Counters::default()
            },
        ),
    );
    let request = Request::new(
        Operation::Create,
        "Movie",
        ResolveTree::new("createMovies")
            .arg("input", json!([{ "title": "A" }]))
            .field(
                "CreateMoviesMutationResponse",
                ResolveTree::new("movies").field("Movie", ResolveTree::new("title")),
            )
            .field(
                "CreateMoviesMutationResponse",
                ResolveTree::new("info").field("CreateInfo", ResolveTree::new("nodesCreated")),
            ),
    );

    let value = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap();

    assert_eq!(
        value,
        Value::from(json!({
            "movies": [{ "title": "A" }],
            "info": { "nodesCreated": 1 },
        }))
    );
    assert_eq!(executor.queries()[0].access_mode, AccessMode::Write);
}

#[tokio::test]
async fn delete_reports_counters() {
    let executor = MockExecutor::returning(Response::default().with_counters(Counters {
        nodes_deleted: 2,
        relationships_deleted: 5,
        ..Counters::default()
    }));
    let request = Request::new(
        Operation::Delete,
        "Movie",
        ResolveTree::new("deleteMovies")
            .field("DeleteInfo", ResolveTree::new("nodesDeleted"))
            .field("DeleteInfo", ResolveTree::new("relationshipsDeleted")),
    );

    let value = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap();

    assert_eq!(
        value,
        Value::from(json!({ "nodesDeleted": 2, "relationshipsDeleted": 5 }))
    );
}

#[tokio::test]
async fn failed_assertion_is_forbidden() {
    let executor = MockExecutor::failing(
        "Failed to invoke function `apoc.util.validatePredicate`: \
         Caused by: java.lang.RuntimeException: @gqlcypher/FORBIDDEN",
    );
    let request = Request::new(
        Operation::Create,
        "Movie",
        ResolveTree::new("createMovies").arg(
            "input",
            json!([{
                "title": "The Matrix",
                "genres": {
                    "connectOrCreate": [{
                        "where": { "node": { "name": "Action" } },
                        "onCreate": { "node": { "name": "Action" } }
                    }]
                }
            }]),
        ),
    );
    let cx = Context::authenticated(json!({ "roles": ["viewer"] }));

    let err = support::compiler(support::movies())
        .execute(&executor, &request, &cx)
        .await
        .unwrap_err();

    assert!(err.is_forbidden());
    assert_eq!(err.to_string(), "forbidden");
    assert_eq!(executor.queries().len(), 1);
}

#[tokio::test]
async fn executor_errors_pass_through() {
    let executor = MockExecutor::failing("connection refused");
    let request = Request::new(
        Operation::Read,
        "Movie",
        ResolveTree::new("movies").field("Movie", ResolveTree::new("title")),
    );

    let err = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap_err();

    assert!(err.is_executor());
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn rejected_requests_never_reach_the_executor() {
    let executor = MockExecutor::returning(Response::default());
    let request = Request::new(
        Operation::Read,
        "Movie",
        ResolveTree::new("movies").arg("where", json!({ "budget": 1 })),
    );

    let err = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap_err();

    assert!(err.is_invalid_request());
    assert!(executor.queries().is_empty());
}

#[tokio::test]
async fn out_of_range_cursor_is_rejected() {
    let executor = MockExecutor::returning(Response::default());
    let request = Request::new(
        Operation::Connection,
        "Movie",
        // arrayconnection:9223372036854775807
        ResolveTree::new("moviesConnection")
            .arg("after", "YXJyYXljb25uZWN0aW9uOjkyMjMzNzIwMzY4NTQ3NzU4MDc=")
            .field(
                "MoviesConnection",
                ResolveTree::new("edges").field(
                    "MovieEdge",
                    ResolveTree::new("node").field("Movie", ResolveTree::new("title")),
                ),
            ),
    );

    let err = support::compiler(support::movies())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap_err();

    assert!(err.is_invalid_request());
    assert!(executor.queries().is_empty());
}

#[tokio::test]
async fn empty_relationships_keep_their_cardinality() {
    let executor = MockExecutor::returning(Response::from_records([
        record(json!({ "this": { "content": "A", "author": null, "likes": [] } })),
        record(json!({ "this": { "content": "B" } })),
    ]));
    let request = Request::new(
        Operation::Read,
        "Post",
        ResolveTree::new("posts")
            .field("Post", ResolveTree::new("content"))
            .field(
                "Post",
                ResolveTree::new("author").field("User", ResolveTree::new("name")),
            )
            .field(
                "Post",
                ResolveTree::new("likes").field("User", ResolveTree::new("name")),
            ),
    );

    let value = support::compiler(support::posts())
        .execute(&executor, &request, &Context::anonymous())
        .await
        .unwrap();

    assert_eq!(
        value,
        Value::from(json!([
            { "content": "A", "author": null, "likes": [] },
            { "content": "B", "author": null, "likes": [] },
        ]))
    );
}
