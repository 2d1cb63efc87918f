// Library target exists for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// harnesses can import types via `speldr::engine::*` / `speldr::session::*`.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by integration tests and benchmarks
pub mod engine;
pub mod error;
pub mod lesson;
pub mod session;
pub mod sinks;
pub mod store;
pub mod timer;

// Private: only reachable through the binary
mod app;
mod config;
mod event;
mod ui;
