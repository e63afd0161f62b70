//! Benchmarking harness for image patch matching.
//!
//! A set of small "part" images is located inside a database of "original" images by a
//! number of techniques: dense descriptors searched with a sliding window (HOG, fuzzy transform)
//! and keypoint descriptors matched by brute force (SIFT, SURF, BRIEF, ORB, FREAK).
//! Every run records timing and size diagnostics which can be reported and aggregated.

pub mod error;
pub mod numerics;
pub mod io;
pub mod image;
pub mod matching;
pub mod algorithms;
pub mod report;
pub mod visualize;
pub mod evaluation;
pub mod benchmark;

pub use error::{BenchError, Result};

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum GradientDirection {
    HORIZONTAL,
    VERTICAL
}
