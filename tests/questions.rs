use axum::http::StatusCode;
use serde_json::json;

mod helpers;

use helpers::{json_body, json_request, location, request, setup_test_app};

fn question() -> serde_json::Value {
    json!({
        "title": "Async lifetimes",
        "content": "How do lifetimes interact with async blocks in practice?"
    })
}

#[tokio::test]
async fn test_anonymous_question_redirects_to_login() {
    let app = setup_test_app().await.unwrap();

    let response = app
        .send(json_request("POST", "/questions", None, question()))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?redirect=%2Fquestions")
    );

    let response = app.send(request("GET", "/questions", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_question_thread_round_trip() {
    let app = setup_test_app().await.unwrap();
    let admin = app.sign_up_admin("root@example.com").await;
    let ada = app.sign_up("ada@example.com").await;
    let bob = app.sign_up("bob@example.com").await;

    let response = app
        .send(json_request("POST", "/questions", Some(&ada), question()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_owned();

    let response = app
        .send(request("GET", "/admin/questions?status=open", Some(&admin)))
        .await;
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

    let response = app
        .send(json_request(
            "POST",
            &format!("/admin/questions/{id}/replies"),
            Some(&admin),
            json!({ "body": "Borrow across await points carefully." }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["kind"], "answer");

    let response = app
        .send(request("POST", &format!("/admin/questions/{id}/resolve"), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(request("GET", &format!("/questions/{id}"), Some(&ada)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let thread = json_body(response).await;
    assert_eq!(thread["status"], "resolved");
    assert_eq!(thread["replies"].as_array().unwrap().len(), 1);

    let response = app
        .send(request("GET", &format!("/questions/{id}"), Some(&bob)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(request("GET", &format!("/questions/{id}"), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(request("GET", "/questions", Some(&ada))).await;
    assert_eq!(json_body(response).await[0]["id"], id.as_str());

    let response = app.send(request("GET", "/questions", Some(&bob))).await;
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_closed_question_takes_no_replies() {
    let app = setup_test_app().await.unwrap();
    let admin = app.sign_up_admin("root@example.com").await;
    let ada = app.sign_up("ada@example.com").await;

    let response = app
        .send(json_request("POST", "/questions", Some(&ada), question()))
        .await;
    let id = json_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_owned();

    let response = app
        .send(request("POST", &format!("/admin/questions/{id}/close"), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(json_request(
            "POST",
            &format!("/admin/questions/{id}/replies"),
            Some(&admin),
            json!({ "body": "Too late" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], "This question is closed");
}
