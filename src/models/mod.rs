//! ViewModels exposed to the adapter

pub mod state_updater;
pub mod user;
