//! Command-line interface for the snipstash application.

mod app;
mod args;

pub use app::App;
pub use args::Cli;
