pub mod build;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod notes;
pub mod release;
pub mod ui;

pub use error::{ReleaseError, Result};
