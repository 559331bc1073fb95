use b_cryptic::{
    compose_pages, verify, verify_paths, CourierMeasure, DocumentSink, DocumentSource,
    LayoutConfig, Mode, PdfSink, PdfSource, Processor, TokenTable,
};
use std::fs;
use std::path::PathBuf;

/// Creates a fresh scratch directory for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("b_cryptic_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes a single-page prose PDF to use as a pipeline source.
fn write_prose_pdf(path: &PathBuf, text: &str) {
    let config = LayoutConfig::default();
    let mut sink = PdfSink::new(config);
    for page in compose_pages(text, &config, &CourierMeasure) {
        sink.append_page(&page);
    }
    sink.write(path).unwrap();
}

#[test]
fn end_to_end_pdf_round_trip() {
    let dir = scratch_dir("round_trip");
    let source_path = dir.join("source.pdf");
    let encoded_path = dir.join("encoded.pdf");
    let decoded_path = dir.join("decoded.pdf");

    let original = "the quick brown fox jumps over the lazy dog";
    write_prose_pdf(&source_path, original);

    let processor = Processor::with_defaults(TokenTable::standard());

    let outcome = processor.encode_pdf(&source_path, &encoded_path).unwrap();
    assert!(outcome.success, "{:?}", outcome.diagnostics);

    let source = PdfSource::open(&source_path).unwrap();
    let encoded = PdfSource::open(&encoded_path).unwrap();
    let report = verify(&source, &encoded, Mode::Encode, TokenTable::standard());
    assert!(report.passed, "{:?}", report.diagnostics);

    let outcome = processor.decode_pdf(&encoded_path, &decoded_path).unwrap();
    assert!(outcome.success, "{:?}", outcome.diagnostics);

    let decoded = PdfSource::open(&decoded_path).unwrap();
    let report = verify(&encoded, &decoded, Mode::Decode, TokenTable::standard());
    assert!(report.passed, "{:?}", report.diagnostics);

    // Layout may reflow the prose; the word sequence must survive the trip.
    let decoded_text = decoded.page_texts().join(" ");
    let decoded_words: Vec<&str> = decoded_text.split_whitespace().collect();
    assert_eq!(decoded_words, original.split_whitespace().collect::<Vec<_>>());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_middle_page_is_isolated() {
    let dir = scratch_dir("empty_page");
    let source_path = dir.join("source.pdf");
    let output_path = dir.join("encoded.pdf");

    // Three-page source where page two renders no text at all.
    let config = LayoutConfig::default();
    let measure = CourierMeasure;
    let mut sink = PdfSink::new(config);
    let first = compose_pages("page one text", &config, &measure);
    sink.append_page(&first[0]);
    sink.append_page(&b_cryptic::RenderedPage {
        lines: vec![],
        cached_text: String::new(),
    });
    let third = compose_pages("page three text", &config, &measure);
    sink.append_page(&third[0]);
    sink.write(&source_path).unwrap();

    let processor = Processor::with_defaults(TokenTable::standard());
    let outcome = processor.encode_pdf(&source_path, &output_path).unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.diagnostics.len(), 1, "{:?}", outcome.diagnostics);
    assert!(outcome.diagnostics[0].contains("page 2"));

    // Pages one and three were still transformed.
    let output = PdfSource::open(&output_path).unwrap();
    assert_eq!(output.page_count(), 2);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn batch_isolates_unreadable_document() {
    let dir = scratch_dir("batch");
    let out_dir = dir.join("out");
    fs::create_dir_all(&out_dir).unwrap();

    let first = dir.join("one.pdf");
    let second = dir.join("two.pdf");
    let third = dir.join("three.pdf");
    write_prose_pdf(&first, "first document text");
    fs::write(&second, b"this is not a pdf at all").unwrap();
    write_prose_pdf(&third, "third document text");

    let processor = Processor::with_defaults(TokenTable::standard());
    let (succeeded, failed) = processor.batch_process(
        &[first, second, third],
        &out_dir,
        Mode::Encode,
    );

    assert_eq!(succeeded, vec!["one.pdf".to_string(), "three.pdf".to_string()]);
    assert_eq!(failed, vec!["two.pdf".to_string()]);
    assert!(out_dir.join("b_cryptic_one.pdf").exists());
    assert!(out_dir.join("b_cryptic_three.pdf").exists());

    // Each surviving batch output can be verified against its own source.
    for name in ["one.pdf", "three.pdf"] {
        let report = verify_paths(
            &dir.join(name),
            &out_dir.join(format!("b_cryptic_{name}")),
            Mode::Encode,
            TokenTable::standard(),
        );
        assert!(report.passed, "{name}: {:?}", report.diagnostics);
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn verify_paths_reports_unreadable_documents() {
    let dir = scratch_dir("verify_paths");
    let source_path = dir.join("source.pdf");
    write_prose_pdf(&source_path, "some source text");

    // Missing destination is a failed report, not a panic or an error.
    let report = verify_paths(
        &source_path,
        &dir.join("never_written.pdf"),
        Mode::Encode,
        TokenTable::standard(),
    );
    assert!(!report.passed);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.contains("cannot open destination")));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn token_mode_page_overflow_splits_output() {
    let dir = scratch_dir("overflow");
    let source_path = dir.join("source.pdf");
    let output_path = dir.join("encoded.pdf");

    // Enough prose that the encoded token stream needs more than one page:
    // each char becomes a token, three tokens per line, 36 lines per page.
    let long_text = "many words of filler text here ".repeat(20);
    write_prose_pdf(&source_path, long_text.trim());

    let processor = Processor::with_defaults(TokenTable::standard());
    let outcome = processor.encode_pdf(&source_path, &output_path).unwrap();
    assert!(outcome.success, "{:?}", outcome.diagnostics);

    let output = PdfSource::open(&output_path).unwrap();
    assert!(output.page_count() > 1);

    // The overflow is visible to the verifier as a page count mismatch.
    let source = PdfSource::open(&source_path).unwrap();
    let report = verify(&source, &output, Mode::Encode, TokenTable::standard());
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.contains("page count mismatch")));

    fs::remove_dir_all(&dir).unwrap();
}
