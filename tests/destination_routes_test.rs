mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_root_and_health() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "active");

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["service"].is_string());
    assert!(body["timestamp"].is_string());
    assert!(body["version"].is_string());
    assert_eq!(body["dependencies"]["database"]["status"], "ok");
    assert_eq!(body["dependencies"]["ai_provider"]["status"], "disabled");
}

#[actix_rt::test]
#[serial]
async fn test_search_total_matches_filter() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let cases = [
        ("/api/v1/destinations/search", 5),
        ("/api/v1/destinations/search?q=candi", 1),
        ("/api/v1/destinations/search?q=BALI", 1),
        ("/api/v1/destinations/search?category=beach", 1),
        ("/api/v1/destinations/search?price_range=moderate", 3),
        ("/api/v1/destinations/search?province=jawa%20timur", 1),
        ("/api/v1/destinations/search?city=Yogya", 0),
        ("/api/v1/destinations/search?min_rating=4.5", 2),
        ("/api/v1/destinations/search?price_range=moderate&min_rating=4.5", 2),
        ("/api/v1/destinations/search?page_size=2&page=3", 5),
    ];

    for (uri, expected_total) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], expected_total, "{}", uri);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/search?page_size=2&page=3")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["destinations"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/search?q=danau&category=nature")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["query"], "danau");
    assert_eq!(body["filters_applied"]["category"], "nature");
    assert_eq!(body["destinations"][0]["name"], "Danau Toba");
}

#[actix_rt::test]
#[serial]
async fn test_search_rejects_bad_parameters() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    for uri in [
        "/api/v1/destinations/search?page=0",
        "/api/v1/destinations/search?page_size=101",
        "/api/v1/destinations/search?min_rating=6",
        "/api/v1/destinations/search?category=space",
        "/api/v1/destinations/search?page=abc",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
    }
}

#[actix_rt::test]
#[serial]
async fn test_list_and_get() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    for uri in ["/api/v1/destinations", "/api/v1/destinations/?page_size=2"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 5);
        assert!(body["items"].is_array());
    }

    let toba = test_app.destination_named("Danau Toba").await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/destinations/{}", toba.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Danau Toba");
    assert_eq!(body["data"]["location"]["province"], "Sumatera Utara");

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/not-a-destination")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn test_categories_list() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/categories/list")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let categories = body["data"].as_array().unwrap();
    assert_eq!(categories.len(), 11);
    assert!(categories.contains(&json!("religious")));
}

#[actix_rt::test]
#[serial]
async fn test_nearby_destinations() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let borobudur = test_app.destination_named("Candi Borobudur").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/destinations/nearby/{}", borobudur.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Malioboro Street");
    assert!(hits[0]["distance_km"].as_f64().unwrap() < 50.0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/destinations/nearby/{}?radius_km=10", borobudur.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/destinations/nearby/{}?radius_km=500", borobudur.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/nearby/missing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn test_reviews_and_sentiment() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let ijen = test_app.destination_named("Kawah Ijen").await;
    let reviews_uri = format!("/api/v1/destinations/{}/reviews", ijen.id);

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/sentiment-analysis")
        .set_json(&json!({"destination_id": ijen.id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["source_count"], 0);
    assert_eq!(body["data"]["overall"], 0.7);

    for (user, rating, content) in [
        ("u1", 5, "Blue fire sangat indah dan langka"),
        ("u2", 2, "Pendakian berat, bau belerang menyengat"),
    ] {
        let req = test::TestRequest::post()
            .uri(&reviews_uri)
            .set_json(&json!({"user_id": user, "rating": rating, "content": content}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri(&reviews_uri)
        .set_json(&json!({"user_id": "u1", "rating": 4, "content": "Datang lagi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&reviews_uri)
        .set_json(&json!({"user_id": "u3", "rating": 6, "content": "Terlalu bagus"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri(&reviews_uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/destinations/{}", ijen.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["rating"], 3.5);
    assert_eq!(body["data"]["review_count"], 2);
    assert_eq!(body["data"]["sentiment"]["overall"], 0.7);

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/sentiment-analysis")
        .set_json(&json!({"destination_id": ijen.id, "force_refresh": true}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["source_count"], 2);
    assert_eq!(body["data"]["positive"], 0.5);
    assert_eq!(body["data"]["negative"], 0.5);
    assert_eq!(body["data"]["overall"], 0.0);

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/sentiment-analysis")
        .set_json(&json!({"destination_id": "missing"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/missing/reviews")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
