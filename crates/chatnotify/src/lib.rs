pub mod card;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod logging;
pub mod sender;
