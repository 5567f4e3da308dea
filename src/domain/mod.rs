//! Domain layer for rask-logger.
//!
//! Contains the canonical types shared across all modules:
//! - `Value` / `Fields`: dynamic metadata values and ordered field maps
//! - `NativeError`: a built-in runtime error instance
//! - `ForwardedError`: an error re-wrapped at an action boundary
//! - `LogLevel`: emission severity (info/warn/error)

pub mod error;
pub mod fields;
pub mod forwarded;
pub mod log_level;
pub mod native_error;
pub mod value;

pub use error::{CodecError, ValueError};
pub use fields::Fields;
pub use forwarded::ForwardedError;
pub use log_level::LogLevel;
pub use native_error::NativeError;
pub use value::{Array, Object, Value};
