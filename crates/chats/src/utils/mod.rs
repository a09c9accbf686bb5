//! Internal utilities for the chat services.

pub mod validation;

pub use validation::{ChatCreationValidator, MessageValidator, Validator};
