#[path = "../common/mod.rs"]
mod common;

mod generators;
mod sampling;
