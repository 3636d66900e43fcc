//! Integration test: server endpoints

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use crop_price::inference::{InferenceEngine, InferencePolicy, PredictionRequest, SoilDefaults};
use crop_price::schema::{self, FeatureRecord, FeatureSchema};
use crop_price::server::{create_router, AppState, ServerConfig};
use crop_price::training::{TrainEngine, TrainingConfig};
use crop_price::utils::Dataset;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn test_state(policy: InferencePolicy) -> Arc<AppState> {
    let rows = (0..30)
        .map(|i| {
            let record = FeatureRecord::new()
                .with_text(schema::STATE, if i % 2 == 0 { "Punjab" } else { "Kerala" })
                .with_text(schema::SOIL_TYPE, if i % 3 == 0 { "Black soil" } else { "Red soil" })
                .with_text(schema::CROP, if i % 5 == 0 { "Wheat" } else { "Rice" })
                .with_number(schema::N_SOIL, 50.0 + i as f64)
                .with_number(schema::P_SOIL, 40.0)
                .with_number(schema::K_SOIL, 45.0)
                .with_number(schema::TEMPERATURE, 25.0 + (i % 4) as f64)
                .with_number(schema::HUMIDITY, 75.0)
                .with_number(schema::PH, 6.5)
                .with_number(schema::RAINFALL, 200.0 + (i % 6) as f64 * 10.0);
            (record, 1000.0 + 12.5 * i as f64)
        })
        .collect();
    let dataset = Dataset::from_records(FeatureSchema::crop_default(), rows).unwrap();
    let model = TrainEngine::new(TrainingConfig::new().with_n_estimators(8))
        .fit(&dataset)
        .unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_path: PathBuf::from("unused.json"),
        policy,
    };
    let engine = InferenceEngine::new(Arc::new(model), Arc::new(SoilDefaults::standard()), policy);
    Arc::new(AppState::new(config, engine))
}

fn test_app() -> axum::Router {
    create_router(test_state(InferencePolicy::Lenient))
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_serves_form() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<form action=\"/predict\" method=\"post\">"));
    assert!(html.contains("Black soil"));
    assert!(html.contains("name=\"RAINFALL\""));
}

#[tokio::test]
async fn test_predict_returns_rounded_value() {
    let state = test_state(InferencePolicy::Lenient);
    let expected = state
        .engine
        .predict(&PredictionRequest::new("Punjab", "Black soil", "Wheat").with_value(schema::N_SOIL, "60"))
        .unwrap()
        .rounded();

    let response = create_router(state)
        .oneshot(form_request("STATE=Punjab&SOIL_TYPE=Black+soil&CROP=Wheat&N_SOIL=60&P_SOIL="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(
        html.contains(&format!("<p id=\"prediction\">{:.2}</p>", expected)),
        "unexpected page: {}",
        html
    );
}

#[tokio::test]
async fn test_missing_categorical_is_plain_text_error() {
    let response = test_app()
        .oneshot(form_request("SOIL_TYPE=Black+soil&CROP=Wheat"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Error: Missing required field: STATE");
}

#[tokio::test]
async fn test_invalid_number_is_plain_text_error() {
    let response = test_app()
        .oneshot(form_request("STATE=Punjab&SOIL_TYPE=Black+soil&CROP=Wheat&ph=acidic"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.starts_with("Error: Invalid number for ph"), "{}", text);
}

#[tokio::test]
async fn test_strict_policy_over_http() {
    let app = create_router(test_state(InferencePolicy::Strict));
    let response = app
        .oneshot(form_request("STATE=Punjab&SOIL_TYPE=Black+soil&CROP=Wheat"))
        .await
        .unwrap();

    let text = body_text(response).await;
    assert!(text.starts_with("Error: Missing required field"), "{}", text);
}

#[tokio::test]
async fn test_unknown_categories_still_predict() {
    let response = test_app()
        .oneshot(form_request("STATE=Atlantis&SOIL_TYPE=Moon+soil&CROP=Saffron"))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Predicted Crop Price"), "{}", html);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["policy"], "lenient");
    assert_eq!(json["n_trees"], 8);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app()
        .oneshot(Request::builder().uri("/api/models").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Not found: /api/models");
}
