// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw EMNIST IDX files
// to tensor batches ready for the training loop.
//
// The pipeline flows in this order:
//
//   IDX files
//       │
//       ▼
//   EmnistLoader      → parses images + labels, validates them
//       │
//       ▼
//   GlyphDataset      → implements Burn's Dataset trait,
//       │               truncated by subsample_len
//       ▼
//   GlyphBatcher      → normalises, one-hot encodes, stacks
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads EMNIST IDX files from disk
pub mod loader;

/// Scaling, one-hot encoding and subsampling
pub mod preprocessor;

/// Implements Burn's Dataset trait for glyph samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
