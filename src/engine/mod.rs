// Command planning and process plumbing - independent of the CLI

pub mod core;
pub mod error;
pub mod hardware;
pub mod probe;
pub mod tools;
pub mod validate;

pub use core::*;
pub use error::{ProcessError, ValidationError};
pub use hardware::{Backend, CodecFamily, CodecRequest, EncoderProbe, OsFamily};
