//! imageroller: cloud server image rotation
//!
//! A library for reading and validating the image rotation configuration,
//! and for deciding which server images are due for pruning.

pub mod config;
pub mod retention;
pub mod time;
