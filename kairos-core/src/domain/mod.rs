//! Domain types shared by the data, indicator, and engine layers.

pub mod bar;

pub use bar::{closes, highs, lows, medians, Bar};
