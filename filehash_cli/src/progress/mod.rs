//! Progress reporting module for the CLI
//!
//! The engine reports through a synchronous provider; the CLI forwards those
//! updates over a bounded channel to a renderer task that draws the bars.

pub mod provider;
pub mod renderer;
pub mod utils;

pub use provider::{ChannelProvider, create_progress_infrastructure};
pub use renderer::{ProgressRenderer, render_progress};
pub use utils::{format_throughput, throughput_mbps};
