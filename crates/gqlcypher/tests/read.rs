mod support;

use gqlcypher::{
    driver::AccessMode,
    schema::{
        AuthorizationRule, Entity, Field, Operation as RuleOperation, Relationship,
        RuleCondition, Scalar,
    },
    stmt::Value,
    Compiler, Context, Operation, QueryLimit, Request, ResolveTree, Schema,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn movies_request(tree: ResolveTree) -> Request {
    Request::new(
        Operation::Read,
        "Movie",
        tree.field("Movie", ResolveTree::new("title")),
    )
}

#[test]
fn read_with_where() {
    let request = movies_request(ResolveTree::new("movies").arg("where", json!({ "title": "Matrix" })));
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Movie)\nWHERE this.title = $this_title\nRETURN this { .title } AS this"
    );
    assert_eq!(query.params.get("this_title"), Some(&Value::from("Matrix")));
    assert_eq!(query.params.len(), 1);
    assert_eq!(query.access_mode, AccessMode::Read);
}

#[test]
fn read_without_where_matches_every_node() {
    let request = movies_request(ResolveTree::new("movies"));
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert_eq!(query.cypher, "MATCH (this:Movie)\nRETURN this { .title } AS this");
    assert!(query.params.is_empty());
}

#[test]
fn null_filter_tests_for_absence() {
    let request = movies_request(ResolveTree::new("movies").arg("where", json!({ "title": null })));
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert!(query.cypher.contains("this.title IS NULL"), "{}", query.cypher);
    assert!(query.params.is_empty());
}

#[test]
fn sort_and_limit_order_the_projection() {
    let request = movies_request(
        ResolveTree::new("movies").arg(
            "options",
            json!({ "sort": [{ "title": "DESC" }], "limit": 50 }),
        ),
    );
    let compiler = Compiler::builder()
        .schema(support::movies())
        .limit(QueryLimit {
            default: None,
            max: Some(5),
        })
        .build()
        .unwrap();

    let query = compiler.compile(&request, &Context::anonymous()).unwrap();

    assert!(query.cypher.starts_with("MATCH (this:Movie)\nWITH this { .title } AS this"));
    assert!(query.cypher.contains("\nORDER BY this.title DESC"), "{}", query.cypher);
    assert!(query.cypher.contains("\nLIMIT $this_limit"), "{}", query.cypher);
    assert!(query.cypher.ends_with("RETURN this"));
    assert_eq!(query.params.get("this_limit"), Some(&Value::Int(5)));
}

#[test]
fn default_limit_applies_without_options() {
    let request = movies_request(ResolveTree::new("movies"));
    let compiler = Compiler::builder()
        .schema(support::movies())
        .limit(QueryLimit {
            default: Some(10),
            max: None,
        })
        .build()
        .unwrap();

    let query = compiler.compile(&request, &Context::anonymous()).unwrap();
    assert_eq!(query.params.get("this_limit"), Some(&Value::Int(10)));
}

#[test]
fn relationship_fields_cannot_be_sorted() {
    let request = movies_request(
        ResolveTree::new("movies").arg("options", json!({ "sort": [{ "genres": "ASC" }] })),
    );
    let err = support::compile(support::movies(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn negative_offset_is_rejected() {
    let request = movies_request(ResolveTree::new("movies").arg("options", json!({ "offset": -1 })));
    let err = support::compile(support::movies(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn regex_filters_must_be_enabled() {
    let request = movies_request(
        ResolveTree::new("movies").arg("where", json!({ "title_MATCHES": "(?i)matrix.*" })),
    );

    let err = support::compile(support::movies(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());

    let compiler = Compiler::builder()
        .schema(support::movies())
        .enable_regex(true)
        .build()
        .unwrap();
    let query = compiler.compile(&request, &Context::anonymous()).unwrap();
    assert!(query.cypher.contains("this.title =~ $"), "{}", query.cypher);
}

#[test]
fn unknown_fields_are_rejected() {
    let request = movies_request(ResolveTree::new("movies").arg("where", json!({ "budget": 10 })));
    let err = support::compile(support::movies(), &request, &Context::anonymous()).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn related_nodes_are_projected_through_a_subquery() {
    let request = Request::new(
        Operation::Read,
        "Movie",
        ResolveTree::new("movies").field(
            "Movie",
            ResolveTree::new("genres").field("Genre", ResolveTree::new("name")),
        ),
    );
    let query = support::compile(support::movies(), &request, &Context::anonymous()).unwrap();

    assert!(query.cypher.contains("CALL {\n    WITH this"), "{}", query.cypher);
    assert!(query.cypher.contains("-[:IN_GENRE]->"), "{}", query.cypher);
    assert!(query.cypher.contains(":Genre)"), "{}", query.cypher);
}

#[test]
fn compiler_is_shareable_across_tasks() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Compiler>();
}

/// Blogs whose posts carry comments only their author may read.
fn blogs() -> Schema {
    Schema::builder()
        .entity(
            Entity::new("Blog")
                .field(Field::primitive("name", Scalar::String))
                .field(Field::relationship("posts", Relationship::outgoing("HAS_POST", "Post"))),
        )
        .entity(
            Entity::new("Post")
                .field(Field::primitive("content", Scalar::String))
                .field(Field::relationship(
                    "comments",
                    Relationship::outgoing("HAS_COMMENT", "Comment"),
                )),
        )
        .entity(
            Entity::new("Comment")
                .field(Field::primitive("text", Scalar::String))
                .field(Field::primitive("authorId", Scalar::ID))
                .rule(
                    AuthorizationRule::filter(RuleCondition::node(json!({ "authorId": "$jwt.sub" })))
                        .operations([RuleOperation::Read]),
                ),
        )
        .build()
        .unwrap()
}

/// The leading whitespace of `line`.
fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[test]
fn nested_rule_filters_its_own_match() {
    let request = Request::new(
        Operation::Read,
        "Blog",
        ResolveTree::new("blogs").field(
            "Blog",
            ResolveTree::new("posts").field(
                "Post",
                ResolveTree::new("comments").field("Comment", ResolveTree::new("text")),
            ),
        ),
    );
    let cx = Context::authenticated(json!({ "sub": "user-1" }));
    let query = support::compile(blogs(), &request, &cx).unwrap();

    let lines: Vec<&str> = query.cypher.lines().collect();
    let comments = lines
        .iter()
        .position(|line| line.contains("-[:HAS_COMMENT]->(this1:Comment)"))
        .expect("comment match");

    // Two CALL blocks deep, with the guard directly under its MATCH
    assert!(lines[comments].trim_start().starts_with("MATCH "), "{}", query.cypher);
    assert_eq!(indent(lines[comments]), 8, "{}", query.cypher);
    assert_eq!(
        lines[comments + 1],
        "        WHERE this1.authorId = $this1_authorId",
        "{}",
        query.cypher
    );
    assert_eq!(query.cypher.matches("authorId").count(), 2, "{}", query.cypher);
    assert_eq!(query.params.get("this1_authorId"), Some(&Value::from("user-1")));
}

#[test]
fn self_referencing_relationships_get_fresh_variables() {
    let schema = Schema::builder()
        .entity(
            Entity::new("User")
                .field(Field::primitive("name", Scalar::String))
                .field(Field::relationship("friends", Relationship::outgoing("FRIENDS", "User"))),
        )
        .build()
        .unwrap();
    let request = Request::new(
        Operation::Read,
        "User",
        ResolveTree::new("users").field(
            "User",
            ResolveTree::new("friends").field(
                "User",
                ResolveTree::new("friends").field("User", ResolveTree::new("name")),
            ),
        ),
    );
    let query = support::compile(schema, &request, &Context::anonymous()).unwrap();

    let hops: Vec<(&str, &str)> = query
        .cypher
        .lines()
        .filter_map(|line| {
            let (from, rest) = line.trim().strip_prefix("MATCH (")?.split_once(")-[:FRIENDS]->(")?;
            Some((from, rest.strip_suffix(":User)")?))
        })
        .collect();

    assert_eq!(hops, [("this", "this0"), ("this0", "this1")], "{}", query.cypher);
}
