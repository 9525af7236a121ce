//! wordstash-providers: definition sources and configuration.
//!
//! Implements the `DefinitionSource` trait over HTTP for dictionaryapi.dev
//! and provides a canned `MockSource` for tests and offline use.

pub mod config;
pub mod dictionary;
pub mod mock;

pub use config::{create_source, load_config, load_config_from, WordstashConfig};
pub use dictionary::DictionaryApiSource;
pub use mock::MockSource;
