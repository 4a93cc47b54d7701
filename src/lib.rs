pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod mode;
pub mod sql;
pub mod transcript;
pub mod tui;
pub mod utils;
