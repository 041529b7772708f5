pub mod client;
pub mod command;
pub mod config;
pub mod events;
pub mod sys;
pub mod trace;
