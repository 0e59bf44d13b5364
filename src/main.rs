use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use news_classifier::{
    CsvLoader, MalformedRowPolicy, ModelStore, Pipeline, PipelineConfig, PredictionEngine,
};
use tracing_subscriber::EnvFilter;

const SAMPLES: [&str; 2] = [
    "Pemerintah telah menyelesaikan pembangunan infrastruktur jalan tol di kawasan Bandung",
    "Semua warga wajib membayar denda 10 juta atau akan dipenjara",
];

#[derive(Parser, Debug)]
#[command(name = "news-classifier")]
#[command(about = "Train and run a TF-IDF + SDCA news classifier")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on a labeled CSV, evaluate, save the model and run two sample predictions
    Train {
        /// Labeled CSV with Label and Berita columns
        #[arg(short, long, default_value = "news_hoax_dataset_v2.csv")]
        data: PathBuf,

        /// Where to write the model
        #[arg(short, long, default_value = "model_hoax.cbor")]
        model: PathBuf,

        /// JSON pipeline config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the split and the trainer
        #[arg(short, long)]
        seed: Option<u64>,

        /// Share of documents held out for evaluation
        #[arg(long)]
        test_fraction: Option<f64>,

        #[arg(long)]
        max_epochs: Option<usize>,

        /// Fail on the first malformed row instead of skipping it
        #[arg(long)]
        strict: bool,
    },
    /// Predict labels with a saved model
    Predict {
        #[arg(short, long, default_value = "model_hoax.cbor")]
        model: PathBuf,

        /// Texts to classify
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Train {
            data,
            model,
            config,
            seed,
            test_fraction,
            max_epochs,
            strict,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::from_path(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
                config.trainer.seed = seed;
            }
            if let Some(fraction) = test_fraction {
                config.test_fraction = fraction;
            }
            if let Some(epochs) = max_epochs {
                config.trainer.max_epochs = epochs;
            }
            if strict {
                config.csv.malformed = MalformedRowPolicy::Fail;
            }
            train(config, &data, &model)
        }
        Command::Predict { model, texts } => {
            let artifact = ModelStore::load(&model)
                .with_context(|| format!("loading model {}", model.display()))?;
            let engine = PredictionEngine::new(artifact);
            for text in &texts {
                let prediction = engine.predict(text);
                println!("{}\t{}", prediction.label, text);
            }
            Ok(())
        }
    }
}

fn train(config: PipelineConfig, data: &Path, model_path: &Path) -> Result<()> {
    println!("1. Loading dataset and splitting...");
    let loaded = CsvLoader::new(config.csv.clone())
        .load_path(data)
        .with_context(|| format!("loading dataset {}", data.display()))?;
    if loaded.skipped > 0 {
        println!("   Skipped rows: {}", loaded.skipped);
    }

    println!("2. Training (tokenize + TF-IDF + min-max + SDCA)...");
    let pipeline = Pipeline::new(config)?;
    let outcome = pipeline.run(&loaded.documents)?;
    println!("   Total documents: {}", loaded.documents.len());
    println!("   Training documents: {}", outcome.train_size);
    println!("   Test documents: {}", outcome.test_size);
    if !outcome.report.converged {
        println!(
            "   Warning: training stopped after {} epochs without converging",
            outcome.report.epochs
        );
    }

    println!("3. Evaluating...");
    match &outcome.metrics {
        Some(metrics) => println!("\n{}\n", metrics),
        None => println!("   No test documents, evaluation skipped\n"),
    }

    ModelStore::save(&outcome.artifact, model_path)
        .with_context(|| format!("saving model {}", model_path.display()))?;
    println!("Model saved to: {}\n", model_path.display());

    println!("4. Sample predictions...");
    let engine = PredictionEngine::new(outcome.artifact);
    for (i, text) in SAMPLES.iter().enumerate() {
        println!("News {}: {}", i + 1, text);
        println!("   Prediction: {}", engine.predict_label(text));
    }
    Ok(())
}
