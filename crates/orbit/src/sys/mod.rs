pub mod driver;
pub mod runtime;
pub mod server;
