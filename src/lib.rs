pub mod app;
pub mod chrome;
pub mod client;
pub mod config;
pub mod error;
pub mod finder;
pub mod markdown;
pub mod pager;
pub mod preview;
pub mod sanitize;
pub mod term;
