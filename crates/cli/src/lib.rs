//! duofont command-line front end.

pub mod cli;
pub mod inspect;
pub mod merge;
pub mod preview;
pub mod shape;
pub mod subset;
