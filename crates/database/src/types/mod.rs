//! Shared types and result types for the database layer

pub mod errors;
pub mod time;

pub use errors::{DatabaseError, StoreError};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type StoreResult<T> = Result<T, StoreError>;
