use b_cryptic::{verify_paths, Mode, Processor, TokenTable};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// B-Cryptic obfuscation tool: encode or decode PDFs and free text through
/// the token-substitution codec.
#[derive(Parser, Debug)]
#[command(name = "b-cryptic")]
#[command(version, about, long_about = None)]
struct Args {
    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a PDF (or, with --batch, every PDF in a directory)
    Encode {
        /// Input PDF file, or a directory with --batch
        input: PathBuf,

        /// Directory the output PDF(s) are written to
        #[arg(short = 'o', long = "output-dir")]
        output_dir: PathBuf,

        /// Treat the input as a directory of PDFs
        #[arg(long, action = ArgAction::SetTrue)]
        batch: bool,

        /// Re-extract the written PDF and check it against the source
        #[arg(long, action = ArgAction::SetTrue)]
        verify: bool,
    },
    /// Decode a PDF (or, with --batch, every PDF in a directory)
    Decode {
        /// Input PDF file, or a directory with --batch
        input: PathBuf,

        /// Directory the output PDF(s) are written to
        #[arg(short = 'o', long = "output-dir")]
        output_dir: PathBuf,

        /// Treat the input as a directory of PDFs
        #[arg(long, action = ArgAction::SetTrue)]
        batch: bool,

        /// Re-extract the written PDF and check it against the source
        #[arg(long, action = ArgAction::SetTrue)]
        verify: bool,
    },
    /// Encode or decode a string of free text
    Text {
        #[command(subcommand)]
        op: TextOp,
    },
}

#[derive(Subcommand, Debug)]
enum TextOp {
    /// Encode free text to a token string
    Encode { text: String },
    /// Decode a token string back to text
    Decode { text: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let processor = Processor::with_defaults(TokenTable::standard());

    match args.command {
        Command::Encode {
            input,
            output_dir,
            batch,
            verify,
        } => run_documents(&processor, &input, &output_dir, Mode::Encode, batch, verify),
        Command::Decode {
            input,
            output_dir,
            batch,
            verify,
        } => run_documents(&processor, &input, &output_dir, Mode::Decode, batch, verify),
        Command::Text { op } => run_text(&processor, op),
    }
}

fn run_text(processor: &Processor, op: TextOp) -> ExitCode {
    let result = match op {
        TextOp::Encode { text } => processor.encode_text(&text),
        TextOp::Decode { text } => processor.decode_text(&text),
    };
    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_documents(
    processor: &Processor,
    input: &Path,
    output_dir: &Path,
    mode: Mode,
    batch: bool,
    check: bool,
) -> ExitCode {
    if batch {
        let inputs = match collect_pdfs(input) {
            Ok(inputs) => inputs,
            Err(e) => {
                eprintln!("error: cannot read {}: {e}", input.display());
                return ExitCode::FAILURE;
            }
        };
        let (succeeded, failed) = processor.batch_process(&inputs, output_dir, mode);
        println!(
            "batch {mode} complete: {} succeeded, {} failed",
            succeeded.len(),
            failed.len()
        );
        for name in &failed {
            eprintln!("failed: {name}");
        }

        let mut ok = failed.is_empty();
        if check {
            for input in &inputs {
                let name = file_name_of(input);
                if !succeeded.contains(&name) {
                    continue;
                }
                let output = output_dir.join(format!("b_cryptic_{name}"));
                let report = verify_paths(input, &output, mode, processor.table());
                for diagnostic in &report.diagnostics {
                    eprintln!("verify {name}: {diagnostic}");
                }
                ok &= report.passed;
            }
        }

        if ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    } else {
        let name = file_name_of(input);
        let output = output_dir.join(format!("b_cryptic_{name}"));

        let outcome = match processor.process_pdf(input, &output, mode) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("error: {mode} failed: {e}");
                return ExitCode::FAILURE;
            }
        };
        for diagnostic in &outcome.diagnostics {
            eprintln!("{diagnostic}");
        }

        let mut ok = outcome.success;
        if check {
            let report = verify_paths(input, &output, mode, processor.table());
            for diagnostic in &report.diagnostics {
                eprintln!("verify: {diagnostic}");
            }
            ok &= report.passed;
        }

        if ok {
            println!("{mode} completed successfully: {}", output.display());
            ExitCode::SUCCESS
        } else {
            println!("{mode} completed with failures: {}", output.display());
            ExitCode::FAILURE
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn collect_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}
