//! Remote Store
//!
//! The backend is treated purely as a capability set: table queries and
//! mutations plus named stored-procedure calls, all over loosely-shaped
//! JSON rows. Every piece of business logic of consequence (availability,
//! keyword validation, order transitions) lives behind these calls.

pub mod procedures;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use thiserror::Error;

pub use procedures::Procedures;

/// Failures at the remote-store boundary.
///
/// A failed call never mutates caller state; the display string of every
/// variant is suitable to show to the user as a retry prompt.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The call never completed (network, timeout, transport).
    #[error("could not reach the store: {0}")]
    Transport(String),

    /// The store answered but the procedure reported a failure.
    #[error("{message}")]
    Procedure {
        /// Procedure that failed.
        name: String,
        /// User-presentable message from the store.
        message: String,
    },

    /// The store answered with a payload this crate cannot understand.
    #[error("unexpected response from the store")]
    MalformedPayload(#[from] serde_json::Error),
}

/// How a filter clause compares a column to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Column equals the value.
    Eq,

    /// Column is greater than or equal to the value.
    Gte,
}

/// One column comparison within a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Column name.
    pub column: String,

    /// Comparison operator.
    pub comparison: Comparison,

    /// Value compared against.
    pub value: Value,
}

/// A conjunction of column comparisons applied to a table operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// An empty filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column == value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause {
            column: column.to_string(),
            comparison: Comparison::Eq,
            value: value.into(),
        });
        self
    }

    /// Require `column >= value`.
    #[must_use]
    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause {
            column: column.to_string(),
            comparison: Comparison::Gte,
            value: value.into(),
        });
        self
    }

    /// The clauses in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

/// Capability set the external backend store exposes.
///
/// Rows and arguments travel as JSON values shaped by the store; typed
/// wrappers live in [`procedures`] and the fetching modules.
#[automock]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Query rows from a table.
    async fn query(&self, table: &str, filter: Filter) -> Result<Vec<Value>, RemoteError>;

    /// Insert a row, returning the stored representation.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, RemoteError>;

    /// Patch every row matching the filter.
    async fn update(&self, table: &str, filter: Filter, patch: Value) -> Result<(), RemoteError>;

    /// Delete every row matching the filter.
    async fn delete(&self, table: &str, filter: Filter) -> Result<(), RemoteError>;

    /// Invoke a named stored procedure.
    async fn call_procedure(&self, name: &str, args: Value) -> Result<Value, RemoteError>;
}
