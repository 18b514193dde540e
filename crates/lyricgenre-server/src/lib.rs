pub mod cli;
pub mod config;
pub mod server;
pub mod state;
pub mod telemetry;

pub use cli::*;
pub use config::*;
pub use server::*;
pub use state::*;
