use crate::{Db, Result};

use relorm_core::Error;

use std::ops::Deref;

/// A database handle bound to one backend transaction.
///
/// Dereferences to a [`Db`], so every operation is available on it. Once
/// committed or rolled back, every operation (including those on `Db`
/// clones taken from it) fails with a transaction-closed error.
#[derive(Debug)]
pub struct Transaction {
    db: Db,
}

impl Transaction {
    pub(super) fn new(db: Db) -> Transaction {
        Transaction { db }
    }

    pub async fn commit(&self) -> Result<()> {
        if !self.db.close() {
            return Err(Error::transaction_closed());
        }
        log::debug!("commit transaction");
        self.db.backend().commit().await
    }

    pub async fn rollback(&self) -> Result<()> {
        if !self.db.close() {
            return Err(Error::transaction_closed());
        }
        log::debug!("rollback transaction");
        self.db.backend().rollback().await
    }
}

impl Deref for Transaction {
    type Target = Db;

    fn deref(&self) -> &Db {
        &self.db
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.db.close() {
            log::warn!("transaction dropped without commit or rollback; changes are discarded");
        }
    }
}
