//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;
use axum::{
    extract::{Form, State},
    response::Html,
    Json,
};

use crate::inference::PredictionRequest;
use crate::schema;

use super::error::Result;
use super::state::AppState;

// ============================================================================
// Pages
// ============================================================================

/// Input form
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(&state.engine.defaults().soils()))
}

/// Handle a form submission
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Html<String>> {
    let request = PredictionRequest::from_form(form)?;
    let estimate = state.engine.predict(&request)?;
    Ok(Html(render_result(estimate.rounded())))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "policy": state.engine.policy().as_str(),
        "resolver": state.engine.resolver_name(),
        "n_trees": state.engine.model().n_trees(),
        "uptime_secs": state.uptime_secs(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Templates
// ============================================================================

fn render_index(soils: &[&str]) -> String {
    let soil_options: String = soils
        .iter()
        .map(|soil| format!("<option value=\"{0}\">{0}</option>", soil))
        .collect::<Vec<_>>()
        .join("\n                ");

    let numeric_inputs: String = schema::NUMERICAL_COLUMNS
        .iter()
        .map(|field| {
            format!(
                "<label>{0}<input type=\"text\" name=\"{0}\" placeholder=\"soil default\"></label>",
                field
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    INDEX_TEMPLATE
        .replace("{{SOIL_OPTIONS}}", &soil_options)
        .replace("{{NUMERIC_INPUTS}}", &numeric_inputs)
}

fn render_result(prediction: f64) -> String {
    RESULT_TEMPLATE.replace("{{PREDICTION}}", &format!("{:.2}", prediction))
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Crop Price Predictor</title>
    <style>
        body { font-family: sans-serif; max-width: 36rem; margin: 2rem auto; }
        label { display: block; margin: 0.5rem 0; }
        input, select { display: block; width: 100%; padding: 0.3rem; }
        button { margin-top: 1rem; padding: 0.5rem 1.5rem; }
    </style>
</head>
<body>
    <h1>Crop Price Predictor</h1>
    <form action="/predict" method="post">
        <label>STATE<input type="text" name="STATE" required></label>
        <label>SOIL_TYPE
            <select name="SOIL_TYPE" required>
                {{SOIL_OPTIONS}}
            </select>
        </label>
        <label>CROP<input type="text" name="CROP" required></label>
        <fieldset>
            <legend>Leave blank to use the soil defaults</legend>
            {{NUMERIC_INPUTS}}
        </fieldset>
        <button type="submit">Predict</button>
    </form>
</body>
</html>
"#;

const RESULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Crop Price Prediction</title>
</head>
<body>
    <h1>Predicted Crop Price</h1>
    <p id="prediction">{{PREDICTION}}</p>
    <a href="/">Predict another</a>
</body>
</html>
"#;
