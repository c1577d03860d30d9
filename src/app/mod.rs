//! Application orchestration — demo state, event loop plumbing, input
//! handling, and the headless simulator.

pub mod event;
pub mod handler;
pub mod simulate;
pub mod state;
