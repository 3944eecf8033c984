// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Persistence concerns shared by training and inference:
//
//   checkpoint.rs — Saving and loading the classifier artifact
//                   Weights go through Burn's full-precision
//                   MessagePack recorder; TrainConfig goes to
//                   JSON so inference can rebuild the model.
//
//   metrics.rs    — Training metrics logging
//                   Writes epoch-level loss, accuracy and
//                   learning rate to a CSV file.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Classifier artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
