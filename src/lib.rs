#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod config;
pub mod dataset;
pub mod error;
pub mod feed_forward;
pub mod init;
pub mod layers;
pub mod loss;
pub mod matrix;
pub mod trainer;

mod utils;

pub use crate::error::{Error, Result};
