use log::debug;

use crate::connection::Connection;
use crate::error::Result;

/// Locking behavior of the opening BEGIN statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionBehavior {
    #[default]
    Deferred,
    Immediate,
    Exclusive,
}

impl TransactionBehavior {
    fn begin_sql(self) -> &'static str {
        match self {
            TransactionBehavior::Deferred => "BEGIN DEFERRED TRANSACTION",
            TransactionBehavior::Immediate => "BEGIN IMMEDIATE TRANSACTION",
            TransactionBehavior::Exclusive => "BEGIN EXCLUSIVE TRANSACTION",
        }
    }
}

/// Scoped transaction: rolls back when dropped unless [`Transaction::commit`]
/// was called first.
pub struct Transaction<'c> {
    connection: Option<&'c Connection>,
    commit: bool,
}

impl<'c> Transaction<'c> {
    pub fn new(connection: &'c Connection) -> Result<Self> {
        Self::with_behavior(connection, TransactionBehavior::Deferred)
    }

    pub fn with_behavior(connection: &'c Connection, behavior: TransactionBehavior) -> Result<Self> {
        connection.execute(behavior.begin_sql())?;
        Ok(Self {
            connection: Some(connection),
            commit: false,
        })
    }

    /// Marks the transaction to be committed instead of rolled back when it
    /// goes out of scope.
    pub fn commit(&mut self) {
        self.commit = true;
    }

    /// Commits immediately and detaches the helper, so dropping it does
    /// nothing further.
    pub fn commit_now(mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.execute("COMMIT TRANSACTION"),
            None => Ok(()),
        }
    }

    /// Rolls back immediately and detaches the helper.
    pub fn rollback_now(mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.execute("ROLLBACK TRANSACTION"),
            None => Ok(()),
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            let sql = if self.commit { "COMMIT TRANSACTION" } else { "ROLLBACK TRANSACTION" };
            if let Err(e) = connection.execute(sql) {
                debug!("transaction cleanup failed: {e}");
            }
        }
    }
}
