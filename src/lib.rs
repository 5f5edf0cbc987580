pub mod cli;
pub mod common;
pub mod error;
pub mod io;
pub mod model;
pub mod optimizer;
pub mod prob;

#[macro_use]
extern crate approx;
