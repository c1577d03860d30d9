//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer reads the latest engine outputs and turns them into cells on
//! the terminal.  It never talks to the engine directly.

pub mod layout;
pub mod page;
pub mod panels;
pub mod popup;
pub mod smooth_scroll;
pub mod spinner;
pub mod theme;
