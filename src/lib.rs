//! A signal-driven animation engine.
//!
//! `core` holds the engine itself: signal sources, the pure mapper, the
//! single-flight scheduler and the bindings that tie them to output sinks.
//! `app` and `ui` are the terminal demo built on top of it, and
//! `config` its persisted settings.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
