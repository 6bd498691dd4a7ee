//! # Input Module
//!
//! Command decoding and the shared intent record remote commands update.

pub mod commands;
pub mod intent;

pub use commands::*;
pub use intent::*;
