//! Pieces of the demo binary that are not part of the library

pub mod canvas;
pub mod scene;
