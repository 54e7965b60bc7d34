mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_parse_query_uses_keyword_parser() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/parse-query")
        .set_json(&json!({
            "query": "Liburan 5 hari ke Lombok dengan pasangan, suka pantai dan gunung, budget 8 juta"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["destination"], "Lombok");
    assert_eq!(data["duration"], 5);
    assert_eq!(data["budget"], 8000000.0);
    assert_eq!(data["traveler_type"], "couple");
    assert_eq!(data["interests"], json!(["pantai", "alam"]));
    assert!(data["traveler_count"].is_null());
    assert_eq!(data["confidence"], 0.6);
    assert_eq!(data["source"], "fallback");
    assert_eq!(data["degraded"], false);
    assert_eq!(data["provider"], "none");
}

#[actix_rt::test]
#[serial]
async fn test_failing_provider_is_reported_as_degraded() {
    let test_app = TestApp::with_failing_ai().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/parse-query")
        .set_json(&json!({"query": "Liburan 3 hari ke Bali"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["destination"], "Bali");
    assert_eq!(body["data"]["source"], "fallback");
    assert_eq!(body["data"]["degraded"], true);
    assert_eq!(body["data"]["provider"], "openai");

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/chat")
        .set_json(&json!({"message": "Halo"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["data"]["response"],
        "Maaf, saya mengalami kesulitan memproses pertanyaan Anda. Silakan coba lagi."
    );
    assert_eq!(body["data"]["degraded"], true);
}

#[actix_rt::test]
#[serial]
async fn test_recommendations_fallback() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/recommendations")
        .set_json(&json!({"destination": "Yogyakarta", "interests": ["budaya"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let first = &body["data"]["recommendations"][0];
    assert_eq!(first["name"], "Destinasi Populer di Yogyakarta");
    assert_eq!(first["match_score"], 0.8);
    assert_eq!(body["data"]["source"], "fallback");
}

#[actix_rt::test]
#[serial]
async fn test_optimize_route_fallback() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/optimize-route")
        .set_json(&json!({
            "destinations": ["Ubud", "Tanah Lot", "Uluwatu"],
            "start_location": "Denpasar",
            "preferences": {"transport": "mobil"}
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = &body["data"];
    assert_eq!(data["optimized_route"], json!(["Ubud", "Tanah Lot", "Uluwatu"]));
    assert_eq!(data["route_details"][0]["from"], "Denpasar");
    assert_eq!(data["route_details"][2]["from"], "Tanah Lot");
    assert_eq!(data["total_distance"], 150);
    assert_eq!(data["total_cost"], 300000);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/optimize-route")
        .set_json(&json!({"destinations": [], "start_location": "Denpasar"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
#[serial]
async fn test_model_status_without_provider() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/ai/model-status")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["provider"], "none");
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["capabilities"], json!([]));
}

#[actix_rt::test]
#[serial]
async fn test_chat_canned_replies() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/chat")
        .set_json(&json!({"message": "Berapa biaya ke Bali?", "context": {"trip": "bali"}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let reply = body["data"]["response"].as_str().unwrap();
    assert!(reply.starts_with("Untuk estimasi budget perjalanan"));
    assert_eq!(body["data"]["context"]["trip"], "bali");
    assert_eq!(body["data"]["degraded"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/chat")
        .set_json(&json!({"message": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
#[serial]
async fn test_budget_estimate_fallback() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/budget-estimate")
        .set_json(&json!({
            "destination": "Bali",
            "duration": 3,
            "traveler_count": 2,
            "comfort_level": "budget"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = &body["data"];
    assert_eq!(data["total_budget"]["recommended"], 1800000.0);
    assert_eq!(data["daily_budget"]["recommended"], 300000.0);
    assert_eq!(data["breakdown"]["accommodation"]["percentage"], 0.35);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/budget-estimate")
        .set_json(&json!({"destination": "Bali", "duration": 0, "traveler_count": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
#[serial]
async fn test_travel_plan_without_providers_returns_mock() {
    let test_app = TestApp::with_failing_ai().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/travel-plan")
        .set_json(&json!({"query": "Liburan santai ke Bali", "preferences": {"budget": 5000000}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ai_provider"], "mock_data");
    assert_eq!(body["data"]["title"], "Jelajah Bali 3 Hari 2 Malam");
    assert_eq!(body["data"]["tips"].as_array().unwrap().len(), 3);
}
