// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Everything that builds, trains or runs the network lives here.
//
// What's in this layer:
//
//   model.rs      — The glyph CNN in three variants
//                   • 3×3 ReLU convolutions + 2×2 max pooling
//                   • dense-512 head with dropout
//                   • categorical cross-entropy over one-hot targets
//
//   scheduler.rs  — Reduce-on-plateau learning rate policy
//                   driven by validation accuracy
//
//   trainer.rs    — The training loop
//                   Forward pass, loss, backward pass, Adam step,
//                   validation after every epoch
//
//   inferencer.rs — The inference engine
//                   Loads the artifact, canonicalises a glyph,
//                   returns class probabilities
//
// Backend selection: NdArray on the CPU by default, WGPU when the
// crate is built with `--features wgpu`.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Convolutional glyph classifier
pub mod model;

/// Learning rate reduction when validation accuracy stalls
pub mod scheduler;

/// Full training loop with validation
pub mod trainer;

/// Inference engine — loads the artifact and classifies glyphs
pub mod inferencer;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;
