//! End-to-end tests driving the full router in memory.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use sample_api::api::{create_router, AppState};

const TOKEN: &str = "correct_token";

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn get_with_token(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("token", token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

fn app() -> Router {
    create_router(AppState::default())
}

#[tokio::test]
async fn root_greets() {
    let (status, body) = get(&app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Hello World"}));
}

#[tokio::test]
async fn item_id_is_parsed_as_integer() {
    let app = app();
    for (raw, expected) in [("3", 3), ("-12", -12), ("0", 0)] {
        let (status, body) = get(&app, &format!("/items/{raw}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"item_id": expected}));
    }
}

#[tokio::test]
async fn non_integer_item_id_is_rejected() {
    let (status, body) = get(&app(), "/items/foo").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "int_parsing",
            "loc": ["path", "item_id"],
            "msg": "Input should be a valid integer, unable to parse string as an integer",
            "input": "foo"
        }]})
    );
}

#[tokio::test]
async fn models_have_distinct_messages() {
    let app = app();
    for (name, message) in [
        ("alexnet", "Deep Learning FTW!"),
        ("lenet", "LeCNN all the images"),
        ("resnet", "Have some residuals"),
    ] {
        let (status, body) = get(&app, &format!("/models/{name}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"model_name": name, "message": message}));
    }
}

#[tokio::test]
async fn unknown_model_is_rejected() {
    let app = app();
    for name in ["vgg", "AlexNet"] {
        let (status, body) = get(&app, &format!("/models/{name}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["type"], "enum");
        assert_eq!(body["detail"][0]["loc"], json!(["path", "model_name"]));
    }
}

#[tokio::test]
async fn file_path_keeps_slashes() {
    let (status, body) = get(&app(), "/files/home/johndoe/myfile.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"file_path": "home/johndoe/myfile.txt"}));
}

#[tokio::test]
async fn empty_file_path_is_allowed() {
    let (status, body) = get(&app(), "/files/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"file_path": ""}));
}

#[tokio::test]
async fn catalog_paging() {
    let app = app();

    let (status, body) = get(&app, "/querys/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"item_name": "Foo"}, {"item_name": "Bar"}, {"item_name": "Baz"}])
    );

    let (_, body) = get(&app, "/querys/?skip=1&limit=1").await;
    assert_eq!(body, json!([{"item_name": "Bar"}]));

    let (status, body) = get(&app, "/querys/?skip=50&limit=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (_, body) = get(&app, "/querys/?skip=-1").await;
    assert_eq!(body, json!([{"item_name": "Baz"}]));
}

#[tokio::test]
async fn catalog_rejects_non_integer_paging() {
    let app = app();

    let (status, body) = get(&app, "/querys/?skip=a").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "int_parsing",
            "loc": ["query", "skip"],
            "msg": "Input should be a valid integer, unable to parse string as an integer",
            "input": "a"
        }]})
    );

    let (status, body) = get(&app, "/querys/?skip=1&limit=b").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["query", "limit"]));
}

#[tokio::test]
async fn bare_paths_redirect_to_slashed_routes() {
    let app = app();

    for (method, uri, location) in [
        (Method::GET, "/querys?skip=1&limit=1", "/querys/?skip=1&limit=1"),
        (Method::POST, "/sample_items", "/sample_items/"),
        (Method::POST, "/users", "/users/"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], location);
    }

    let (_, body) = get(&app, "/querys/?skip=1&limit=1").await;
    assert_eq!(body, json!([{"item_name": "Bar"}]));
}

#[tokio::test]
async fn user_item_includes_description_unless_short() {
    let app = app();

    let (status, body) = get(&app, "/users/7/items/1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "item_id": "1001",
            "owner_id": 7,
            "description": "This is an amazing item that has a long description"
        })
    );

    let (_, body) = get(&app, "/users/7/items/1001?q=hoge&short=true").await;
    assert_eq!(body, json!({"item_id": "1001", "owner_id": 7, "q": "hoge"}));

    let (_, body) = get(&app, "/users/7/items/1001?q=&short=1").await;
    assert_eq!(body, json!({"item_id": "1001", "owner_id": 7}));
}

#[tokio::test]
async fn user_item_rejects_non_integer_owner() {
    let (status, body) = get(&app(), "/users/taro/items/1001").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["path", "user_id"]));
}

#[tokio::test]
async fn sample_item_adds_price_with_tax() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/sample_items/",
        None,
        json!({"name": "a", "price": 10, "tax": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "a",
            "description": null,
            "price": 10.0,
            "tax": 2.0,
            "price_with_tax": 12.0
        })
    );

    let (_, body) = send_json(
        &app,
        Method::POST,
        "/sample_items/",
        None,
        json!({"name": "a", "price": 10}),
    )
    .await;
    assert_eq!(
        body,
        json!({"name": "a", "description": null, "price": 10.0, "tax": null})
    );

    let (_, body) = send_json(
        &app,
        Method::POST,
        "/sample_items/",
        None,
        json!({"name": "a", "price": 10, "tax": 0}),
    )
    .await;
    assert!(body.get("price_with_tax").is_none());
}

#[tokio::test]
async fn sample_item_rejects_malformed_bodies() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/sample_items/",
        None,
        json!({"price": "cheap"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "float_type",
            "loc": ["body", "price"],
            "msg": "Input should be a valid number",
            "input": "cheap"
        }]})
    );

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/sample_items/",
        None,
        json!({"price": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "missing");
    assert_eq!(body["detail"][0]["loc"], json!(["body", "name"]));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/sample_items/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "json_invalid");
    assert_eq!(body["detail"][0]["loc"], json!(["body", 1]));
}

#[tokio::test]
async fn dummy_item_merges_id_item_and_q() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/dummy_items/5?q=search",
        None,
        json!({"name": "b", "description": "d", "price": 1.5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "item_id": 5,
            "name": "b",
            "description": "d",
            "price": 1.5,
            "tax": null,
            "q": "search"
        })
    );

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/dummy_items/five",
        None,
        json!({"name": "b", "price": 1.5}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn dummy_item_reports_path_and_body_together() {
    let (status, body) = send_json(
        &app(),
        Method::PUT,
        "/dummy_items/five",
        None,
        json!({"name": "b"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let locs: Vec<Value> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["loc"].clone())
        .collect();
    assert_eq!(locs, vec![json!(["path", "item_id"]), json!(["body", "price"])]);
}

#[tokio::test]
async fn get_user_checks_token_then_existence() {
    let app = app();

    let (status, body) = get_with_token(&app, "/users/abcde12345", TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": "abcde12345", "name": "Yamada", "email_address": "yamada@example.com"})
    );

    let (status, body) = get_with_token(&app, "/users/abcde12345", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "token_verification_failed"}));

    let (status, body) = get_with_token(&app, "/users/zzz", TOKEN).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "user_not_found"}));

    // Token is checked before existence.
    let (status, body) = get_with_token(&app, "/users/zzz", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "token_verification_failed"}));
}

#[tokio::test]
async fn missing_token_header_is_a_validation_error() {
    let (status, body) = get(&app(), "/users/abcde12345").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "missing");
    assert_eq!(body["detail"][0]["loc"], json!(["header", "token"]));
}

#[tokio::test]
async fn create_user_reports_missing_token_and_bad_body_together() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/users/",
        None,
        json!({"id": "u9", "name": "N"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [
            {
                "type": "missing",
                "loc": ["header", "token"],
                "msg": "Field required",
                "input": null
            },
            {
                "type": "missing",
                "loc": ["body", "email_address"],
                "msg": "Field required",
                "input": null
            }
        ]})
    );
}

#[tokio::test]
async fn create_user_then_fetch_then_duplicate() {
    let app = app();
    let user = json!({"id": "sato001", "name": "Sato", "email_address": "sato@example.com"});

    let (status, body) = send_json(&app, Method::POST, "/users/", Some(TOKEN), user.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user);

    let (status, body) = get_with_token(&app, "/users/sato001", TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user);

    let (status, body) = send_json(&app, Method::POST, "/users/", Some(TOKEN), user.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "user_id_duplicated"}));
}

#[tokio::test]
async fn create_user_checks_token_before_duplicate() {
    let app = app();
    let existing = json!({"id": "abcde12345", "name": "X", "email_address": "x@example.com"});

    let (status, body) = send_json(&app, Method::POST, "/users/", Some("nope"), existing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "token_verification_failed"}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_have_one_winner() {
    let app = app();
    let user = json!({"id": "racer", "name": "R", "email_address": "r@example.com"});

    let first = {
        let app = app.clone();
        let user = user.clone();
        tokio::spawn(async move { send_json(&app, Method::POST, "/users/", Some(TOKEN), user).await })
    };
    let second = {
        let app = app.clone();
        let user = user.clone();
        tokio::spawn(async move { send_json(&app, Method::POST, "/users/", Some(TOKEN), user).await })
    };

    let (first, second) = (first.await.unwrap(), second.await.unwrap());
    let mut statuses = vec![first.0, second.0];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);
}

#[tokio::test]
async fn unknown_route_returns_not_found_detail() {
    let (status, body) = get(&app(), "/does/not/exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not Found"}));
}

#[tokio::test]
async fn wrong_method_returns_json_detail() {
    let response = app()
        .oneshot(Request::builder().uri("/users/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers()[header::ALLOW]
        .to_str()
        .unwrap()
        .contains("POST"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"detail": "Method Not Allowed"}));
}
