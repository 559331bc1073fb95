use crate::document::{DocumentSource, PdfSource};
use crate::processor::Mode;
use crate::token::{all_tokens, TokenTable};
use std::path::Path;

/// Post-hoc verdict on a produced document. Failures are reported, never
/// thrown: the caller gets a boolean plus human-readable diagnostics.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub passed: bool,
    pub diagnostics: Vec<String>,
}

impl VerifyReport {
    fn new() -> Self {
        Self {
            passed: true,
            diagnostics: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.diagnostics.push(message);
        self.passed = false;
    }
}

/// Checks that `dest` is a faithful transform of `source` in the given
/// direction. First-page text carries the content checks, matching how the
/// documents were produced page by page.
pub fn verify(
    source: &dyn DocumentSource,
    dest: &dyn DocumentSource,
    mode: Mode,
    table: &TokenTable,
) -> VerifyReport {
    let mut report = VerifyReport::new();

    let source_pages = source.page_count();
    let dest_pages = dest.page_count();
    if source_pages != dest_pages {
        report.fail(format!(
            "page count mismatch: source has {source_pages}, destination has {dest_pages}"
        ));
    }

    let dest_text = dest.page_texts().first().map(String::as_str).unwrap_or("");
    if dest_text.trim().is_empty() {
        report.fail("destination yields no extractable text".to_string());
        return report;
    }
    let source_text = source.page_texts().first().map(String::as_str).unwrap_or("");

    match mode {
        Mode::Encode => {
            if source_text == dest_text {
                report.fail("destination text is identical to source".to_string());
            }
            // The sigil is optional in the grammar, so the marker check has
            // to scan for full grammar matches rather than sigil prefixes.
            let scanned = all_tokens(dest_text);
            if scanned.is_empty() {
                report.fail("no encoded markers found in destination".to_string());
            } else {
                let invalid = scanned.iter().filter(|t| !table.contains(t)).count();
                if invalid > 0 {
                    report.fail(format!(
                        "destination contains {invalid} block(s) missing from the table"
                    ));
                }
            }
        }
        Mode::Decode => {
            if !all_tokens(dest_text).is_empty() {
                report.fail("token syntax remains in decoded destination".to_string());
            }
        }
    }

    report
}

/// Opens both written documents and verifies them. Open failures land in
/// the report like any other diagnostic instead of propagating.
pub fn verify_paths(
    input: &Path,
    output: &Path,
    mode: Mode,
    table: &TokenTable,
) -> VerifyReport {
    let mut report = VerifyReport::new();
    let source = match PdfSource::open(input) {
        Ok(source) => source,
        Err(e) => {
            report.fail(format!("cannot reopen source {}: {e}", input.display()));
            return report;
        }
    };
    let dest = match PdfSource::open(output) {
        Ok(dest) => dest,
        Err(e) => {
            report.fail(format!("cannot open destination {}: {e}", output.display()));
            return report;
        }
    };
    verify(&source, &dest, mode, table)
}
