//! Core engine – signal sources, mapping, scheduling, and binding glue.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Hosts feed
//! it geometry and events through [`surface::Host`] / [`surface::HostEvent`],
//! and read results back through [`sink::OutputSink`]s.

pub mod cancel;
pub mod engine;
pub mod mapper;
pub mod registry;
pub mod scheduler;
pub mod signal;
pub mod sink;
pub mod surface;
