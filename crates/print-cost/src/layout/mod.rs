//! Layout calculation modules for costing
//!
//! This module handles the geometric side of imposition:
//! - Whole-copy fitting of a piece into a container, with rotation

mod fit;

pub use fit::*;
