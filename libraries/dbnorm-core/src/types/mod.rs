//! Domain types

mod format;
mod signal;

pub use format::{AudioFormat, EncodeParams, FormatCapabilities, SupportedFormatSet};
pub use signal::{DecodedSignal, SampleKind, SampleSpec};
