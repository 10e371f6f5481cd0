pub mod clipboard;
pub mod encoder;
pub mod paths;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use encoder::{EncodeError, Encoder};
pub use pipeline::{ExportError, ExportOutcome, ExportPipeline};
