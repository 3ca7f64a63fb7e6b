//! Career counseling chat backend: conversation store, agent graph, and HTTP API.

// Language-level discipline
#![deny(warnings)] // Every warning is an error
#![deny(unsafe_code)] // No unsafe code
#![deny(missing_docs)] // Public items carry documentation
#![deny(dead_code)]
#![deny(non_camel_case_types)]
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)] // Results and Options must be handled
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]

// Clippy
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)] // No unwrap() outside tests
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)] // Logging goes through tracing
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)] // const where possible
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
#![cfg_attr(
    test,
    allow(
        dead_code,
        unused_imports,
        unused_variables,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::too_many_lines
    )
)]

// Robustness
#![deny(overflowing_literals)]

/// Agent graph: live LLM nodes, mock responder, and pipeline execution.
pub mod agent;

/// Conversation records, the store, and the chat orchestrator.
pub mod conversation;

/// Identifiers, errors, and settings shared by every layer.
pub mod core;

/// HTTP surface built on axum.
#[allow(clippy::missing_errors_doc, clippy::unused_async)]
pub mod server;

/// Process startup: tracing, settings, runtime, server.
pub mod start_career_agent;
