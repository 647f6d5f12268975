//! roster_client - CLI client for the roster API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::RosterClient;
pub use error::{ClientError, Result};
