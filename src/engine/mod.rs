//! Engine module: hashing, path helpers, CLI plumbing

pub mod arg_parser;
pub mod cli;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, setup_opts};
pub use hashing::{digest_to_hex, hash_bytes, hash_file};
pub use tools::{
    is_hidden_key, path_key, path_relative_to, path_to_key_string, running_as_root,
};
