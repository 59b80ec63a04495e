use super::{Serial, UndoError};
use log::{debug, error};
use std::ops::{Deref, DerefMut};

/// Hands out undo serials and tracks the (single) open transaction.
#[derive(Debug)]
pub struct TransactionManager {
    next: u64,
    open: Option<Serial>,
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionManager {
    pub fn new() -> Self {
        Self { next: 1, open: None }
    }

    fn allocate(&mut self) -> Serial {
        let serial = Serial(self.next);
        self.next += 1;
        serial
    }

    /// Opens a transaction.
    ///
    /// Nested transactions are not supported: while one is open this returns
    /// [`UndoError::TransactionMisuse`] and leaves the open one untouched.
    pub fn begin(&mut self) -> Result<Serial, UndoError> {
        if let Some(open) = self.open {
            error!("Transaction misuse: begin while {} is open", open);
            return Err(UndoError::TransactionMisuse { open });
        }
        let serial = self.allocate();
        self.open = Some(serial);
        debug!("Opened transaction {}", serial);
        Ok(serial)
    }

    /// Closes the open transaction. `serial` must match it.
    pub fn close(&mut self, serial: Serial) -> Result<(), UndoError> {
        if self.open != Some(serial) {
            return Err(UndoError::CloseMismatch {
                expected: self.open,
                got: serial,
            });
        }
        self.open = None;
        debug!("Closed transaction {}", serial);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<Serial> {
        self.open
    }

    /// Marker to stamp on the next edit: the open transaction's serial, or a
    /// fresh one so an unbracketed edit forms its own undo step.
    pub fn marker_for_edit(&mut self) -> Serial {
        match self.open {
            Some(serial) => serial,
            None => self.allocate(),
        }
    }
}

/// Anything that owns a [`TransactionManager`] and can be bracketed.
pub trait Transactional {
    fn transaction_manager(&mut self) -> &mut TransactionManager;
}

/// Scoped transaction guard.
///
/// Begins on construction and closes when dropped, so every exit path of the
/// bracketed operation (normal return, `?`, panic unwind) closes it exactly
/// once. The guard dereferences to the wrapped target so edits go through it.
pub struct Transaction<'a, T: Transactional> {
    target: &'a mut T,
    serial: Serial,
}

impl<'a, T: Transactional> Transaction<'a, T> {
    /// Opens a transaction on `target`.
    ///
    /// # Errors
    /// [`UndoError::TransactionMisuse`] if `target` already has one open.
    pub fn begin(target: &'a mut T) -> Result<Self, UndoError> {
        let serial = target.transaction_manager().begin()?;
        Ok(Self { target, serial })
    }

    pub fn serial(&self) -> Serial {
        self.serial
    }

    /// Closes the transaction now. Equivalent to dropping the guard.
    pub fn close(self) {}
}

impl<T: Transactional> Deref for Transaction<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Transactional> DerefMut for Transaction<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Transactional> Drop for Transaction<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.target.transaction_manager().close(self.serial) {
            error!("Failed to close transaction: {}", err);
        }
    }
}
