//! Benchmark crate for LUX.
//!
//! See `benches/lux_bench.rs`; run with `cargo bench`.
