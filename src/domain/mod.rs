// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits that describe what the system
// works with: glyphs cut out of a page, the alphabet the
// classifier speaks, and the step that turns classified glyphs
// back into text.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, traits and pure functions
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The fixed 62-symbol EMNIST byclass alphabet
pub mod alphabet;

// A single segmented glyph and its position on the page
pub mod glyph;

// Core abstractions (traits) that other layers implement
pub mod traits;

// Glyphs + classifier → output string
pub mod reconstructor;
