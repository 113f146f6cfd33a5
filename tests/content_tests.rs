
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;
use voltage_backend::{
    entities::document::Collection,
    repositories::memory_store::StoreRules,
};

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}

#[actix_rt::test]
async fn service_lifecycle_follows_language_and_price_changes() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let id = app.add(&token, "services", service_body("sl", "Montaža vtičnic", "35€/vtičnica")).await;

    let (_, sl) = app.get_json("/api/v1/services?language=sl").await;
    let (_, en) = app.get_json("/api/v1/services?language=en").await;
    assert_eq!(titles(&sl), vec!["Montaža vtičnic"]);
    assert!(titles(&en).is_empty());

    let (_, before) = app.get_json(&format!("/api/v1/services/{}", id)).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = app
        .client
        .patch(app.url(&format!("/api/v1/services/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "price": "40€/vtičnica" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, after) = app.get_json(&format!("/api/v1/services/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["price"], "40€/vtičnica");
    assert_eq!(after["title"], "Montaža vtičnic");
    assert_eq!(after["materials"], before["materials"]);
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert!(timestamp(&after["updatedAt"]) > timestamp(&before["updatedAt"]));

    let response = app
        .client
        .delete(app.url(&format!("/api/v1/services/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = app.get_json(&format!("/api/v1/services/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, sl) = app.get_json("/api/v1/services?language=sl").await;
    assert!(titles(&sl).is_empty());
}

#[actix_rt::test]
async fn deleting_an_absent_id_is_not_an_error() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .delete(app.url("/api/v1/faqs/does-not-exist"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn writes_without_a_session_are_refused_and_change_nothing() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/services"))
        .json(&service_body("sl", "Montaža vtičnic", "35€/vtičnica"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["action"], "login");
    assert!(body["error"].as_str().unwrap().contains("adding services"));
    assert!(app.store.is_empty(Collection::Services));

    let token = app.admin_token().await;
    let id = app.add(&token, "faqs", faq_body("sl", "Ali nudite garancijo?", "Da.")).await;

    let response = app
        .client
        .patch(app.url(&format!("/api/v1/faqs/{}", id)))
        .json(&json!({ "answer": "Ne." }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_, faq) = app.get_json(&format!("/api/v1/faqs/{}", id)).await;
    assert_eq!(faq["answer"], "Da.");
}

#[actix_rt::test]
async fn invalid_bearer_token_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/v1/services"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn caller_supplied_timestamps_are_discarded() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let mut body = faq_body("en", "Do you offer a warranty?", "Yes, up to 5 years.");
    body["createdAt"] = json!("2000-01-01T00:00:00Z");
    body["updatedAt"] = json!("2000-01-01T00:00:00Z");
    let id = app.add(&token, "faqs", body).await;

    let (_, faq) = app.get_json(&format!("/api/v1/faqs/{}", id)).await;
    assert!(timestamp(&faq["createdAt"]).timestamp() > 946_684_800);
    assert_eq!(faq["createdAt"], faq["updatedAt"]);
}

#[actix_rt::test]
async fn later_faq_update_wins() {
    let app = TestApp::spawn().await;
    let first = app.admin_token().await;
    let second = app.admin_token().await;
    let id = app.add(&first, "faqs", faq_body("sl", "Koliko stane pregled?", "50€")).await;

    for (token, answer) in [(&first, "60€"), (&second, "70€")] {
        let response = app
            .client
            .patch(app.url(&format!("/api/v1/faqs/{}", id)))
            .bearer_auth(token)
            .json(&json!({ "answer": answer }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let (_, faq) = app.get_json(&format!("/api/v1/faqs/{}", id)).await;
    assert_eq!(faq["answer"], "70€");
    assert_eq!(faq["question"], "Koliko stane pregled?");
}

#[actix_rt::test]
async fn listing_without_ordering_support_still_filters_by_language() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    app.add(&token, "services", service_body("sl", "Montaža svetil", "25€/svetilo")).await;
    app.add(&token, "services", service_body("en", "Light fitting", "€25/light")).await;
    app.add(&token, "services", service_body("sl", "Odpravljanje napak", "45€/ura")).await;

    let (_, ordered) = app.get_json("/api/v1/services?language=sl").await;
    assert_eq!(titles(&ordered), vec!["Odpravljanje napak", "Montaža svetil"]);

    app.store.set_rules(StoreRules { ordered_queries: false, writable: true });

    let (status, unordered) = app.get_json("/api/v1/services?language=sl").await;
    assert_eq!(status, StatusCode::OK);
    let mut found = titles(&unordered);
    found.sort();
    assert_eq!(found, vec!["Montaža svetil", "Odpravljanje napak"]);

    let (_, everything) = app.get_json("/api/v1/services/all-languages").await;
    assert_eq!(everything.as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn drafts_and_patches_are_validated() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/v1/services"))
        .bearer_auth(&token)
        .json(&service_body("sl", "", "35€"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");

    let response = app
        .client
        .post(app.url("/api/v1/projects"))
        .bearer_auth(&token)
        .json(&json!({
            "language": "sl",
            "title": "Pametna hiša",
            "description": "KNX sistem",
            "image": "ftp://example.com/hisa.jpg",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .client
        .get(app.url("/api/v1/services?language=de"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty(Collection::Services));
    assert!(app.store.is_empty(Collection::Projects));
}

#[actix_rt::test]
async fn translations_are_scoped_per_language() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    app.add(
        &token,
        "translations",
        json!({ "language": "en", "key": "hero.title", "value": "Power done right" }),
    )
    .await;

    let (_, en) = app.get_json("/api/v1/translations?language=en").await;
    let (_, sl) = app.get_json("/api/v1/translations?language=sl").await;
    assert_eq!(en.as_array().unwrap().len(), 1);
    assert_eq!(en[0]["key"], "hero.title");
    assert!(sl.as_array().unwrap().is_empty());
}
