use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crop_recommender::cli::{BatchArgs, Cli, Commands, PredictArgs};
use crop_recommender::{Classifier, FittedTransformer, PipelineArtifacts, Prediction, RawSample};

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let artifacts = load_artifacts(cli.artifacts.as_deref())?;

    match cli.command {
        Commands::Predict(args) => run_predict(&artifacts, &args),
        Commands::Batch(args) => run_batch(&artifacts, &args),
        Commands::Inspect => run_inspect(&artifacts),
    }
}

fn load_artifacts(path: Option<&Path>) -> Result<PipelineArtifacts> {
    let path: PathBuf = path
        .map(Path::to_path_buf)
        .context("no artifact bundle given; pass --artifacts or set CROP_ARTIFACTS")?;
    PipelineArtifacts::load(&path)
        .with_context(|| format!("failed to load artifacts from {}", path.display()))
}

fn run_predict(artifacts: &PipelineArtifacts, args: &PredictArgs) -> Result<ExitCode> {
    let sample = RawSample::new(
        args.nitrogen,
        args.phosphorus,
        args.potassium,
        args.temperature,
        args.humidity,
        args.ph,
        args.rainfall,
    );
    let prediction = artifacts
        .recommend(&sample)
        .context("could not compute a recommendation")?;

    if args.json {
        let top: Vec<_> = prediction
            .top_k(args.top)
            .into_iter()
            .map(|(crop, p)| json!({ "crop": crop, "probability": p }))
            .collect();
        let out = json!({
            "crop": prediction.crop,
            "confidence": prediction.confidence,
            "top": top,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Recommended crop: {}", prediction.crop);
        if let Some(confidence) = prediction.confidence {
            println!("Confidence: {:.1}%", confidence * 100.0);
        }
        for (rank, (crop, p)) in prediction.top_k(args.top).into_iter().enumerate() {
            println!("  {}. {:<12} {:.3}", rank + 1, crop.as_str(), p);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn describe(prediction: &Prediction) -> String {
    match prediction.confidence {
        Some(c) => format!("{} ({:.3})", prediction.crop, c),
        None => prediction.crop.to_string(),
    }
}

fn run_batch(artifacts: &PipelineArtifacts, args: &BatchArgs) -> Result<ExitCode> {
    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let mut failed = 0usize;
    let mut total = 0usize;
    for (i, record) in reader.deserialize::<RawSample>().enumerate() {
        let row = i + 1;
        total += 1;
        let outcome = record
            .map_err(|e| ("parse", e.to_string()))
            .and_then(|sample| {
                artifacts
                    .recommend(&sample)
                    .map_err(|e| (e.kind(), e.to_string()))
            });
        match outcome {
            Ok(prediction) if args.json => println!(
                "{}",
                json!({
                    "row": row,
                    "crop": prediction.crop,
                    "confidence": prediction.confidence,
                })
            ),
            Ok(prediction) => println!("row {}: {}", row, describe(&prediction)),
            Err((kind, message)) => {
                failed += 1;
                if args.json {
                    println!(
                        "{}",
                        json!({ "row": row, "error": { "kind": kind, "message": message } })
                    );
                } else {
                    println!("row {}: error [{}] {}", row, kind, message);
                }
            }
        }
    }

    log::info!("processed {} rows, {} failed", total, failed);
    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_inspect(artifacts: &PipelineArtifacts) -> Result<ExitCode> {
    let scaler = artifacts.scaler();
    let classifier = artifacts.classifier();

    println!("Scaler ({}):", scaler.kind());
    for name in scaler.feature_names_in() {
        println!("  {}", name);
    }
    println!(
        "Classifier ({}, {} features):",
        classifier.kind(),
        classifier.n_features()
    );
    for name in classifier.feature_names() {
        println!("  {}", name);
    }
    println!("Classes:");
    for (index, &code) in classifier.classes().iter().enumerate() {
        let crop = artifacts
            .labels()
            .decode(code)
            .with_context(|| format!("class index {} does not decode", index))?;
        println!("  {:>2} -> {}", index, crop);
    }
    Ok(ExitCode::SUCCESS)
}
