//! `jmap`: command-line interface for the method-call engine.
//!
//! - **`process`**: validate a request envelope and run it against the
//!   reference method registry.
//! - **`pointer`**: evaluate a path (JSON Pointer plus `*`) against a document.
//! - **`blob-id`**: print the content identifier of a file's bytes.
//! - **`id`**: print freshly generated random identifiers.
//!
//! Subcommands that take a FILE read from stdin when it is `-`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use jmap_api::{parse_request, CapabilitySet, Limits};
use jmap_core::{pointer, Id, MethodRegistry, RequestProcessor};

/// jmap: batched method-call engine CLI
#[derive(Parser)]
#[command(name = "jmap", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a request and print the response.
    ///
    /// The envelope is checked exactly as the server checks it. A rejected
    /// envelope prints its problem document to stderr and exits 1.
    ///
    /// Pass `-` as FILE to read from stdin.
    Process {
        /// Path to a JSON request, or `-` for stdin.
        file: PathBuf,

        /// `sessionState` to report in the response.
        #[arg(long, value_name = "STATE", env = "JMAP_SESSION_STATE", default_value = "cli")]
        session_state: String,
    },

    /// Evaluate a path against a JSON document and print the result.
    ///
    /// Examples:
    ///   jmap pointer /list/*/id ids.json
    ///   echo '{"a~b": 1}' | jmap pointer /a~0b -
    Pointer {
        /// Path such as `/list/0/id` or `/list/*/id`.
        path: String,

        /// Path to a JSON document, or `-` for stdin.
        file: PathBuf,
    },

    /// Print the content identifier (`sha256-<hex>`) of a file's bytes.
    BlobId {
        /// Path to any file, or `-` for stdin.
        file: PathBuf,
    },

    /// Print random identifiers, one per line.
    Id {
        /// How many identifiers to print.
        #[arg(short = 'n', long, value_name = "COUNT", default_value_t = 1)]
        count: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            file,
            session_state,
        } => {
            let body = read_input(&file);
            let request = match parse_request(&body, &CapabilitySet::core(), &Limits::default()) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("{}", to_pretty(&e));
                    process::exit(1);
                }
            };
            let processor = RequestProcessor::new(MethodRegistry::with_reference_methods());
            let response = processor.process(&request, &session_state);
            println!("{}", to_pretty(&response));
        }

        Command::Pointer { path, file } => {
            let body = read_input(&file);
            let document: serde_json::Value = serde_json::from_slice(&body)
                .unwrap_or_else(|e| fatal(&format!("failed to parse input as JSON: {}", e)));
            match pointer::evaluate(&path, &document) {
                Ok(value) => println!("{}", to_pretty(&value)),
                Err(e) => {
                    eprintln!("jmap: {}", e);
                    process::exit(1);
                }
            }
        }

        Command::BlobId { file } => {
            let bytes = read_input(&file);
            println!("{}", Id::for_content(&bytes));
        }

        Command::Id { count } => {
            for _ in 0..count {
                println!("{}", Id::random());
            }
        }
    }
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> Vec<u8> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

fn to_pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fatal(&format!("failed to serialise output: {}", e)))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("jmap: {}", msg);
    process::exit(2);
}
