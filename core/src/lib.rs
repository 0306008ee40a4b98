#![no_std]

extern crate alloc;

pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use schedule::*;
pub use session::*;
pub use state::*;
pub use store::*;
pub use types::*;

mod cell;
mod config;
mod engine;
mod error;
mod schedule;
mod session;
mod state;
mod store;
mod types;
