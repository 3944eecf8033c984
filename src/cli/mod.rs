// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains the CNN on EMNIST and saves it
//   2. `read`     — segments a page and prints its text
//   3. `classify` — prints the character in a single glyph image
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, ReadArgs, TrainArgs};

use crate::domain::traits::TextRecognizer;
use crate::vision::segmenter::SegmenterConfig;

#[derive(Parser, Debug)]
#[command(
    name = "handwriting-ocr",
    version,
    about = "Train a CNN on EMNIST, then read handwritten text from page images."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Read(args)     => run_read(args),
            Commands::Classify(args) => run_classify(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on data in: {}", args.data_dir.display());
    let checkpoint_dir = args.checkpoint_dir.clone();

    let report = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete: {} epochs on {} samples, final lr {:.2e}. Model saved to '{}'.",
        report.epochs_run,
        report.samples_per_epoch,
        report.final_lr,
        checkpoint_dir.display(),
    );
    Ok(())
}

fn run_read(args: ReadArgs) -> Result<()> {
    use crate::application::recognize_use_case::RecognizeUseCase;

    let use_case = RecognizeUseCase::new(&args.checkpoint_dir, SegmenterConfig::from(&args))?;
    let text = use_case.recognize(&args.image)?;
    println!("{text}");
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    use crate::application::recognize_use_case::RecognizeUseCase;

    let use_case = RecognizeUseCase::new(&args.checkpoint_dir, SegmenterConfig::default())?;
    println!("{}", use_case.classify_file(&args.image)?);
    Ok(())
}
