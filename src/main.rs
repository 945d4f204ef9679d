use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use grade_predictor::config::{Cli, Command};
use grade_predictor::model::{BatchPredictResponse, RawInputs};
use grade_predictor::{api, batch_predict, classify, data, logger, predict_grade};

#[derive(Serialize)]
struct BatchReport {
    generated_at: chrono::DateTime<Utc>,
    #[serde(flatten)]
    result: BatchPredictResponse,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    match cli.command {
        Command::Serve { server } => {
            println!("🚀 Grade Predictor on http://{}:{}", server.host, server.port);
            println!("   Visit it in your browser!");
            api::start_api(&server)
                .await
                .with_context(|| format!("failed to serve on {}:{}", server.host, server.port))?;
        }
        Command::Predict {
            hours,
            attendance,
            previous,
            json,
        } => {
            let score = predict_grade(hours, attendance, previous);
            let grade = classify(score);
            tracing::debug!("Normalized inputs: {:?}", RawInputs::new(hours, attendance, previous).normalize());

            if json {
                let body = serde_json::json!({
                    "score": score,
                    "label": grade.label,
                    "tier": grade.tier,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("Predicted grade: {score}/100 ({})", grade.label);
            }
        }
        Command::Batch { csv, json } => {
            let students = data::load_students(&csv)
                .with_context(|| format!("failed to load students from {}", csv.display()))?;
            let report = BatchReport {
                generated_at: Utc::now(),
                result: batch_predict(students),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("📊 Batch predictions ({})", report.generated_at.format("%Y-%m-%d %H:%M UTC"));
            for p in &report.result.predictions {
                println!(
                    "- {:<20} {:>3}/100  {:<12} {}",
                    p.name,
                    p.score.value(),
                    p.label,
                    p.recommendation
                );
            }

            let summary = &report.result.summary;
            println!();
            println!("Total students: {}", summary.total_students);
            println!("Average score:  {:.1}", summary.average_score);
            println!(
                "Pass rate:      {:.1}% ({} of {})",
                summary.pass_rate * 100.0,
                summary.pass_count,
                summary.total_students
            );
            println!(
                "Tiers:          {} good, {} warn, {} bad",
                summary.good_count, summary.warn_count, summary.bad_count
            );
        }
    }

    Ok(())
}
