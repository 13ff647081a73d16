//! wirechamber-io: Event file reading and output writing for wirechamber.
//!
//! Raw events are read from a whitespace-separated text format and
//! processed plane outputs are written as CSV or JSON lines.
//!

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::RawEventReader;
pub use writer::{DataFileWriter, OutputFormat};
