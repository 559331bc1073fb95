use crate::codec::Codec;
use crate::document::{DocumentError, DocumentSink, DocumentSource, PdfSink, PdfSource};
use crate::layout::{compose_pages, LayoutConfig};
use crate::metrics::{CourierMeasure, TextMeasure};
use crate::token::TokenTable;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Direction of a document transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Encode => f.write_str("encode"),
            Mode::Decode => f.write_str("decode"),
        }
    }
}

/// Result of one top-level document call. `success` is the logical AND of
/// all per-page outcomes; a run with failed pages still produces partial
/// output and reports `false`. Every recovered failure leaves a diagnostic.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub success: bool,
    pub diagnostics: Vec<String>,
}

impl Outcome {
    fn clean() -> Self {
        Self {
            success: true,
            diagnostics: Vec::new(),
        }
    }

    fn record(&mut self, message: String) {
        debug!("{message}");
        self.diagnostics.push(message);
        self.success = false;
    }
}

/// Drives per-page extraction, the codec, and the composer, isolating each
/// page's failure to that page. Diagnostics are per-call state: they start
/// empty on every top-level call and never leak across unrelated files.
pub struct Processor<'a> {
    table: &'a TokenTable,
    config: LayoutConfig,
    measure: Box<dyn TextMeasure>,
}

impl<'a> Processor<'a> {
    pub fn new(table: &'a TokenTable, config: LayoutConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            table,
            config,
            measure,
        }
    }

    /// Standard table geometry with fixed Courier metrics.
    pub fn with_defaults(table: &'a TokenTable) -> Self {
        Self::new(table, LayoutConfig::default(), Box::new(CourierMeasure))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn table(&self) -> &TokenTable {
        self.table
    }

    /// Transforms every page of `source` into zero or more pages of `sink`.
    /// No page failure is fatal; only the caller-side open/write I/O is.
    pub fn process_document(
        &self,
        source: &dyn DocumentSource,
        sink: &mut dyn DocumentSink,
        mode: Mode,
    ) -> Outcome {
        let mut outcome = Outcome::clean();
        let codec = Codec::new(self.table);

        for (index, text) in source.page_texts().iter().enumerate() {
            let page_num = index + 1;
            if text.trim().is_empty() {
                outcome.record(format!("page {page_num}: empty page text"));
                continue;
            }

            let transformed = match mode {
                Mode::Encode => codec.encode(text),
                Mode::Decode => codec.decode(text),
            };
            let transformed = match transformed {
                Ok(t) => t,
                Err(e) => {
                    outcome.record(format!("page {page_num} failed: {e}"));
                    continue;
                }
            };

            let pages = compose_pages(&transformed, &self.config, self.measure.as_ref());
            if pages.is_empty() {
                outcome.record(format!("page {page_num}: produced no output lines"));
                continue;
            }
            for page in &pages {
                sink.append_page(page);
            }
        }

        outcome
    }

    /// Opens `input`, runs one full transform, writes `output`. Open and
    /// write failures abort with a `DocumentError`; page failures land in
    /// the returned `Outcome` instead.
    pub fn process_pdf(
        &self,
        input: &Path,
        output: &Path,
        mode: Mode,
    ) -> Result<Outcome, DocumentError> {
        let source = PdfSource::open(input)?;
        let mut sink = PdfSink::new(self.config);
        let outcome = self.process_document(&source, &mut sink, mode);
        sink.write(output)?;
        Ok(outcome)
    }

    pub fn encode_pdf(&self, input: &Path, output: &Path) -> Result<Outcome, DocumentError> {
        self.process_pdf(input, output, Mode::Encode)
    }

    pub fn decode_pdf(&self, input: &Path, output: &Path) -> Result<Outcome, DocumentError> {
        self.process_pdf(input, output, Mode::Decode)
    }

    /// Applies the single-document operation to each path independently.
    /// Returns the names that fully succeeded and the names that did not;
    /// one document's fatal error never aborts its siblings.
    pub fn batch_process(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        mode: Mode,
    ) -> (Vec<String>, Vec<String>) {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for input in inputs {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());
            let output = output_dir.join(format!("b_cryptic_{name}"));

            match self.process_pdf(input, &output, mode) {
                Ok(outcome) if outcome.success => succeeded.push(name),
                Ok(outcome) => {
                    for diagnostic in &outcome.diagnostics {
                        debug!("{name}: {diagnostic}");
                    }
                    failed.push(name);
                }
                Err(e) => {
                    warn!("{name}: {mode} failed: {e}");
                    failed.push(name);
                }
            }
        }

        (succeeded, failed)
    }

    /// Free-text passthrough for the CLI surface.
    pub fn encode_text(&self, text: &str) -> Result<String, crate::codec::CodecError> {
        Codec::new(self.table).encode(text)
    }

    pub fn decode_text(&self, text: &str) -> Result<String, crate::codec::CodecError> {
        Codec::new(self.table).decode(text)
    }
}
