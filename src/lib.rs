//! Simple cli for keeping track of daily activities: water intake, steps
//! walked and hours slept. Everything is stored locally as a single json
//! snapshot, so there are no accounts, no sync, and no runtimes to install.
//!

pub mod cli;
pub mod store;
pub mod utils;
