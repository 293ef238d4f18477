// THEORY:
// This file is the main entry point for the `color_census` library crate.
// It exposes the two layers of the engine: the leaf analysis modules under
// `core_modules` (color, histogram, ranking, fetching, and the I/O
// collaborators) and the `pipeline` coordinator that wires them together
// behind bounded worker pools. The binary in `main.rs` is a thin CLI shell
// over this API, so the whole engine is usable and testable as a library.

pub mod core_modules;
pub mod pipeline;
