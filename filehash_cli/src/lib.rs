//! Filehash CLI library
//!
//! Everything the `filehash` binary needs apart from argument parsing:
//! configuration, file intake, progress rendering, result output and the
//! interactive session.

pub mod config;
pub mod error;
pub mod intake;
pub mod orchestrators;
pub mod output;
pub mod paths;
pub mod progress;
pub mod terminal;
