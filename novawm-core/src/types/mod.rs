//! Fundamental data types shared by the NovaWM crates.

pub mod geometry;

pub use geometry::{gravity_adjust, FrameBorders, Gravity, PointInt, RectInt, Side, SizeInt};
