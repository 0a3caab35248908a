
#[allow(unused)]
#[macro_use]
extern crate tracing;

pub mod args;
pub mod utils;
pub mod log;
