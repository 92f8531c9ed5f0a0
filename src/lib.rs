pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod entities;
pub mod fetcher;
pub mod output;
pub mod pipeline;
pub mod utils;
pub mod view;

#[cfg(test)]
mod tests;
