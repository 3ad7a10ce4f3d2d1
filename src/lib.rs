pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod git;
pub mod history;
pub mod payload;
pub mod publish;
pub mod ui;

pub use error::{BuildInfoError, Result};
