pub mod backend;
pub mod blame_parser;
pub mod command;

pub use backend::{GitBackend, GitCli};
