//! Library components of the `loanscore` command-line tool.

pub mod input;
pub mod logging;
pub mod render;
