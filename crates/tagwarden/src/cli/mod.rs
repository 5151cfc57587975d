//! CLI module for Tagwarden
//!
//! Every command loads the inventory, runs one service call, and prints a
//! table or JSON. Mutating commands write the inventory back on commit.

pub mod error;
pub mod output;

pub mod config;
pub mod inventory;

pub mod bulk;
pub mod resources;
pub mod tags;
