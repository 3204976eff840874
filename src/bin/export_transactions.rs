use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process::exit,
};

use clap::Parser;

use transaction_registry::{ImportedTransaction, read_records};

/// Convert an XML transaction file to JSON.
///
/// Records are written as parsed, with the same defaults the server applies.
/// Records without an ID get `null`, and repeated IDs are kept.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the XML file with the transactions.
    #[arg(long)]
    data_path: PathBuf,

    /// Where to write the JSON, stdout if not given.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let records = match read_records(&args.data_path) {
        Ok(records) => records,
        Err(error) => {
            eprintln!("Error: {error}");
            exit(1);
        }
    };
    let json = match to_json(&records) {
        Ok(json) => json,
        Err(error) => {
            eprintln!("Error: could not serialise transactions: {error}");
            exit(1);
        }
    };

    let result = match &args.output {
        Some(path) => fs::write(path, format!("{json}\n")),
        None => writeln!(io::stdout().lock(), "{json}"),
    };

    match (result, &args.output) {
        (Ok(()), Some(path)) => {
            eprintln!(
                "Wrote {} transactions to {}",
                records.len(),
                path.display()
            )
        }
        (Ok(()), None) => {}
        (Err(error), _) => {
            eprintln!("Error: could not write transactions: {error}");
            exit(1);
        }
    }
}

fn to_json(records: &[ImportedTransaction]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
