// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `read` and `classify`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, enums, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;
use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::domain::alphabet::LabelAlphabet;
use crate::ml::{model::ClassifierVariant, scheduler::PlateauConfig};
use crate::vision::segmenter::SegmenterConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the glyph classifier on the EMNIST byclass split
    Train(TrainArgs),

    /// Read the handwritten text on a page image
    Read(ReadArgs),

    /// Classify a single pre-cropped character image
    Classify(ClassifyArgs),
}

/// Network architecture choices exposed on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantArg {
    /// Two valid convolutions, one pooling stage
    Shallow,
    /// Three conv + pool blocks (32, 64, 128 filters)
    ThreeBlock,
    /// Two double-conv blocks (32, 64 filters)
    FourConv,
}

impl From<VariantArg> for ClassifierVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Shallow    => ClassifierVariant::Shallow,
            VariantArg::ThreeBlock => ClassifierVariant::ThreeBlock,
            VariantArg::FourConv   => ClassifierVariant::FourConv,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding the emnist-byclass-* IDX files
    #[arg(long, default_value = "data/mnist")]
    pub data_dir: PathBuf,

    /// Where the trained model, its config and metrics.csv are written
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Maximum number of passes over the training data
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Train on the first 1/N of each split (1 = full dataset)
    #[arg(long, default_value_t = 10)]
    pub subsample: usize,

    #[arg(long, value_enum, default_value_t = VariantArg::Shallow)]
    pub variant: VariantArg,

    /// Epochs without validation improvement before the lr is cut
    #[arg(long, default_value_t = 3)]
    pub patience: usize,

    /// Multiplier applied to the lr on a plateau
    #[arg(long, default_value_t = 0.5)]
    pub factor: f64,

    /// Floor for the learning rate
    #[arg(long, default_value_t = 1e-5)]
    pub min_lr: f64,

    /// Seed for weight init and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:       a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            subsample:      a.subsample,
            variant:        a.variant.into(),
            plateau: PlateauConfig {
                patience: a.patience,
                factor:   a.factor,
                min_lr:   a.min_lr,
                ..PlateauConfig::default()
            },
            seed:           a.seed,
            num_classes:    LabelAlphabet::default().len(),
        }
    }
}

/// All arguments for the `read` command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Page image with dark handwriting on light paper
    #[arg(long)]
    pub image: PathBuf,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Gray level above which a pixel counts as paper
    #[arg(long, default_value_t = 127)]
    pub threshold: u8,

    /// Write the page with glyph bounding boxes drawn to this path
    #[arg(long)]
    pub debug_boxes: Option<PathBuf>,
}

impl From<&ReadArgs> for SegmenterConfig {
    fn from(a: &ReadArgs) -> Self {
        SegmenterConfig {
            threshold:    a.threshold,
            debug_output: a.debug_boxes.clone(),
            ..SegmenterConfig::default()
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Image of a single character
    #[arg(long)]
    pub image: PathBuf,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["handwriting-ocr", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_train_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "handwriting-ocr", "train", "--variant", "four-conv", "--subsample", "1",
            "--patience", "5", "--epochs", "2",
        ]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.variant, ClassifierVariant::FourConv);
        assert_eq!(cfg.subsample, 1);
        assert_eq!(cfg.plateau.patience, 5);
        assert_eq!(cfg.epochs, 2);
    }

    #[test]
    fn test_read_args_build_segmenter_config() {
        let cli = Cli::try_parse_from([
            "handwriting-ocr", "read", "--image", "page.png", "--threshold", "100",
            "--debug-boxes", "boxes.png",
        ]).unwrap();
        let Commands::Read(args) = cli.command else { panic!("expected read") };
        let seg = SegmenterConfig::from(&args);
        assert_eq!(seg.threshold, 100);
        assert_eq!(seg.out_size, 28);
        assert_eq!(seg.debug_output, Some(PathBuf::from("boxes.png")));
    }

    #[test]
    fn test_read_requires_image() {
        assert!(Cli::try_parse_from(["handwriting-ocr", "read"]).is_err());
    }
}
