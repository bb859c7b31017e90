//! Theme Module
//!
//! Color constants plus the frame and visuals helpers the views share.

pub mod colors;
pub mod styles;

pub use colors::*;
pub use styles::*;
