//! Command dispatch and interactive editing core for 2D board layouts.
//!
//! The crate is organised around an [`EditorSession`] (board, paste buffer,
//! undo log, mark and cursor) that two front doors operate on:
//! - the [`action`] dispatcher, which runs named invocations such as
//!   `ChangeSize(Selected, +2mil)` against resolved targets
//! - the [`mode`] machine, which turns pointer and key events into new
//!   geometry according to the active editing mode
//!
//! Every edit is recorded in the undo log and grouped by transaction, so
//! one action or one completed gesture is one undo step.

pub mod action;
pub mod board;
pub mod config;
pub mod editor;
pub mod mode;
pub mod script;
pub mod session;
pub mod undo;
pub mod units;

pub use config::Config;
pub use editor::Editor;
pub use session::EditorSession;
