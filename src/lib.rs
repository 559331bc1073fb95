//! B-Cryptic: a reversible token-substitution codec and the pipeline that
//! lays encoded or decoded text back onto paginated PDF pages, such that a
//! later extraction-and-decode pass recovers the original content.

pub mod codec;
pub mod document;
pub mod layout;
pub mod metrics;
pub mod processor;
pub mod token;
pub mod verify;

pub use codec::{Codec, CodecError};
pub use document::{DocumentError, DocumentSink, DocumentSource, MemoryDocument, PdfSink, PdfSource};
pub use layout::{compose_pages, LayoutConfig, RenderedPage, TextRun};
pub use metrics::{CourierMeasure, GlyphMeasure, TextMeasure};
pub use processor::{Mode, Outcome, Processor};
pub use token::{all_tokens, Token, TokenTable};
pub use verify::{verify, verify_paths, VerifyReport};
