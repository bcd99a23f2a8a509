//! Structured logging and optional OpenTelemetry span export.
//!
//! Logs are always JSON on stdout. When an OTLP endpoint is configured, spans
//! are additionally exported over OTLP/gRPC.
//!
//! # Telemetry invariants
//!
//! - Passwords, password hashes, and bearer tokens must never appear in any
//!   span attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown};
