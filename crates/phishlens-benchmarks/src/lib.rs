//! Latency smoke checks for the decode, present, and render pipeline.
//!
//! The checks are integration tests under `tests/`.
