//! Error model for the benchmark harness.
//! Only configuration problems are recoverable; a broken workload invariant is a
//! panic and never passes through here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BenchError {
    #[error("{code}: {message}")]
    UserInput { code: String, message: String },
    #[error("{code}: {message}")]
    Internal { code: String, message: String },
}

impl BenchError {
    pub fn code_str(&self) -> &str {
        match self {
            BenchError::UserInput { code, .. } | BenchError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            BenchError::UserInput { message, .. } | BenchError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { BenchError::UserInput { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { BenchError::Internal { code: code.into(), message: msg.into() } }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::UserInput { .. } => 2,
            BenchError::Internal { .. } => 1,
        }
    }
}

pub type BenchResult<T> = Result<T, BenchError>;

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Internal { code: "serialize".into(), message: err.to_string() }
    }
}
