pub mod browse;
pub mod clear;
pub mod config;
pub mod context;
pub mod details;
pub mod lookup_ui;
pub mod prompts;
pub mod search;
pub mod watched;

pub use context::AppContext;
