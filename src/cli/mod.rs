//! Crop price CLI module
//!
//! Command-line interface for training, serving and one-off predictions.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::inference::{InferenceEngine, InferencePolicy, PredictionRequest};
use crate::schema;
use crate::training::{TrainEngine, TrainingConfig, DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH};
use crate::utils::MissingValuePolicy;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "crop-price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and serve a crop price regression model")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the model and write the artifact
    Train {
        /// Labeled CSV dataset
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Output model file
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        output: PathBuf,

        /// Number of trees
        #[arg(long, default_value = "100")]
        n_estimators: usize,

        /// Seed for the split and the forest
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Maximum tree depth (unbounded when omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Rows with empty cells: reject or drop
        #[arg(long, default_value = "reject")]
        missing: MissingValuePolicy,

        /// Refuse to persist when hold-out MSE exceeds this value
        #[arg(long)]
        max_mse: Option<f64>,
    },

    /// Start the prediction web server
    Serve {
        /// Server host
        #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, env = "API_PORT", default_value = "5000")]
        port: u16,

        /// Trained model file
        #[arg(short, long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Numeric field policy: lenient or strict
        #[arg(long, env = "INFERENCE_POLICY", default_value = "lenient")]
        policy: InferencePolicy,
    },

    /// Predict one record from the command line
    Predict(PredictArgs),
}

/// Fields of a single prediction; numeric values are optional under the
/// lenient policy
#[derive(clap::Args)]
pub struct PredictArgs {
    /// Trained model file
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Numeric field policy: lenient or strict
    #[arg(long, default_value = "lenient")]
    pub policy: InferencePolicy,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub soil_type: String,

    #[arg(long)]
    pub crop: String,

    #[arg(long)]
    pub n_soil: Option<String>,

    #[arg(long)]
    pub p_soil: Option<String>,

    #[arg(long)]
    pub k_soil: Option<String>,

    #[arg(long)]
    pub temperature: Option<String>,

    #[arg(long)]
    pub humidity: Option<String>,

    #[arg(long)]
    pub ph: Option<String>,

    #[arg(long)]
    pub rainfall: Option<String>,
}

impl PredictArgs {
    /// Request with every supplied numeric value attached
    pub fn to_request(&self) -> PredictionRequest {
        let numeric = [
            (schema::N_SOIL, &self.n_soil),
            (schema::P_SOIL, &self.p_soil),
            (schema::K_SOIL, &self.k_soil),
            (schema::TEMPERATURE, &self.temperature),
            (schema::HUMIDITY, &self.humidity),
            (schema::PH, &self.ph),
            (schema::RAINFALL, &self.rainfall),
        ];

        numeric.into_iter().fold(
            PredictionRequest::new(&self.state, &self.soil_type, &self.crop),
            |request, (field, value)| match value {
                Some(v) => request.with_value(field, v.as_str()),
                None => request,
            },
        )
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(config: TrainingConfig) -> anyhow::Result<()> {
    section("Train");

    println!("  {}", kv("Data  ", &config.data_path.display().to_string()));
    println!("  {}", kv("Trees ", &config.n_estimators.to_string()));
    println!("  {}", kv("Seed  ", &config.random_state.to_string()));
    println!();

    step_run("Training random forest");
    let start = Instant::now();
    let report = TrainEngine::new(config).run()?;
    step_done(&format!("{:.2?}", start.elapsed()));

    if report.dropped_rows > 0 {
        step_ok(&format!("Dropped {} incomplete row(s)", report.dropped_rows));
    }
    step_ok(&format!("Model saved → {}", report.model_path.display()));

    println!();
    println!("  {:<16} {}", muted("Train rows"), report.n_train.to_string().white());
    println!("  {:<16} {}", muted("Test rows"), report.n_test.to_string().white());
    println!("  {:<16} {}", muted("MSE"), format!("{:.2}", report.metrics.mse).white().bold());
    println!("  {:<16} {}", muted("RMSE"), format!("{:.4}", report.metrics.rmse).white());
    println!("  {:<16} {}", muted("MAE"), format!("{:.4}", report.metrics.mae).white());
    if let Some(r2) = report.metrics.r2 {
        println!("  {:<16} {}", muted("R²"), format!("{:.4}", r2).white());
    }
    println!(
        "  {:<16} {}",
        muted("Predicted price"),
        format!("{:.2}", report.sample_prediction).white().bold()
    );
    println!();

    Ok(())
}

pub fn cmd_predict(args: &PredictArgs) -> anyhow::Result<()> {
    let engine = InferenceEngine::from_path(&args.model, args.policy)?;
    let estimate = engine.predict(&args.to_request())?;

    println!("  {} {}", muted("Predicted price"), format!("{:.2}", estimate.rounded()).white().bold());
    Ok(())
}

pub async fn cmd_serve(
    host: &str,
    port: u16,
    model: PathBuf,
    policy: InferencePolicy,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Crop Price Predictor".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Form   ", &format!("http://{}:{}", host, port)));
    line_box(&kv("Health ", &format!("http://{}:{}/health", host, port)));
    line_box(&kv("Model  ", &model.display().to_string()));
    line_box(&kv("Policy ", policy.as_str()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        model_path: model,
        policy,
    };

    run_server(config).await
}
