//! # trackmodel
//!
//! Command-line front end for `trackmodel-core`. All file I/O lives here.

pub mod cli;
