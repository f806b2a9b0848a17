//! Command orchestrators
//!
//! Each orchestrator drives one command from user input through the core
//! [`Session`](filehash_core::Session) to rendered output.

pub mod hash_orchestrator;
pub mod session_shell;
