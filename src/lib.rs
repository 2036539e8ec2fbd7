pub mod api;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod terminal;
