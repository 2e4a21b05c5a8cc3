//! Bridge between the UI thread and the backend worker that runs answer requests.

pub mod commands;
pub mod runtime;
