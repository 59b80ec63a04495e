//! Undo log and transaction bracketing.
//!
//! The [`UndoLog`] stores before/after object pairs tagged with a [`Serial`].
//! All entries sharing a serial form one undo step. The
//! [`TransactionManager`] hands out serials, and the scoped [`Transaction`]
//! guard keeps one serial open for the span of a multi-edit operation and
//! closes it when the guard goes out of scope, whatever the exit path.

mod log;
mod transaction;

pub use log::{UndoEntry, UndoLog, UndoStep};
pub use transaction::{Transaction, TransactionManager, Transactional};

use std::fmt;
use thiserror::Error;

/// Undo-step marker shared by every edit in one logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Serial(pub u64);

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "serial {}", self.0)
    }
}

/// Misuse of the transaction protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    /// `begin` was called while another transaction was open.
    #[error("transaction already open ({open}); nested transactions are not supported")]
    TransactionMisuse { open: Serial },

    /// `close` was called with a serial that is not the open one.
    #[error("closing {got} but {expected:?} is open")]
    CloseMismatch { expected: Option<Serial>, got: Serial },

    /// Undo or redo was requested in the middle of a transaction.
    #[error("cannot step the undo log while {0} is open")]
    TransactionOpen(Serial),
}
