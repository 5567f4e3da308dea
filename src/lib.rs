#![deny(rust_2024_compatibility)]
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Internal API
    clippy::missing_panics_doc,      // Internal API
    clippy::module_name_repetitions, // e.g. ParserRegistry in parser module
    clippy::must_use_candidate,      // Annotated selectively on action handles
    clippy::doc_markdown             // Internal API
)]

pub mod app;
pub mod domain;
pub mod logger;
pub mod parser;

// Re-export main types for easy access
pub use domain::{Fields, ForwardedError, LogLevel, NativeError, Value};
pub use logger::{
    Action, ActionRecord, ActionResult, Actions, LogRecord, Logger, LoggerOptions, MemorySink,
    Metadata, Sink, StdSink,
};
pub use parser::{AppParser, ErrorParser, FieldParser, Parse, ParsedError, ValueParser};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
