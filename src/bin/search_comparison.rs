use std::{
    hint::black_box,
    path::PathBuf,
    process::exit,
    time::{Duration, Instant},
};

use clap::Parser;

use transaction_registry::{TransactionId, TransactionRegistry, read_records};

/// Compare looking up transactions by scanning the list against using the
/// registry's ID index.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the XML file with the transactions.
    #[arg(long)]
    data_path: PathBuf,

    /// How many times each ID is looked up per method.
    #[arg(short, long, default_value_t = 10_000)]
    iterations: u32,
}

/// The time taken to look up each target ID `iterations` times.
struct Timings {
    times: Vec<Duration>,
}

impl Timings {
    fn total(&self) -> Duration {
        self.times.iter().sum()
    }

    fn mean(&self) -> Duration {
        match u32::try_from(self.times.len()) {
            Ok(count) if count > 0 => self.total() / count,
            _ => Duration::ZERO,
        }
    }

    fn median(&self) -> Duration {
        let mut times = self.times.clone();
        times.sort();

        match times.len() {
            0 => Duration::ZERO,
            len if len % 2 == 1 => times[len / 2],
            len => (times[len / 2 - 1] + times[len / 2]) / 2,
        }
    }
}

fn main() {
    let args = Args::parse();

    println!("Loading transaction data...");
    let records = match read_records(&args.data_path) {
        Ok(records) => records,
        Err(error) => {
            eprintln!("Error: {error}");
            exit(1);
        }
    };
    let registry = TransactionRegistry::from_imported(records);

    if registry.is_empty() {
        eprintln!("Error: no transactions in {}", args.data_path.display());
        exit(1);
    }

    println!("Loaded {} transactions", registry.len());

    let target_ids = pick_target_ids(&registry);
    println!(
        "Running {} iterations for each search method...",
        args.iterations
    );

    let linear = time_lookups(&target_ids, args.iterations, |id| {
        registry.find_linear(id).is_some()
    });
    let indexed = time_lookups(&target_ids, args.iterations, |id| registry.get(id).is_ok());

    print_results(registry.len(), args.iterations, &linear, &indexed);
}

/// The IDs of the first, middle and last transactions.
fn pick_target_ids(registry: &TransactionRegistry) -> Vec<TransactionId> {
    let transactions = registry.list();

    let mut ids = vec![
        transactions[0].id,
        transactions[transactions.len() / 2].id,
        transactions[transactions.len() - 1].id,
    ];
    ids.dedup();
    ids
}

fn time_lookups(
    target_ids: &[TransactionId],
    iterations: u32,
    lookup: impl Fn(TransactionId) -> bool,
) -> Timings {
    let times = target_ids
        .iter()
        .map(|&id| {
            let start = Instant::now();
            for _ in 0..iterations {
                black_box(lookup(black_box(id)));
            }
            start.elapsed()
        })
        .collect();

    Timings { times }
}

fn print_results(record_count: usize, iterations: u32, linear: &Timings, indexed: &Timings) {
    let rule = "=".repeat(80);
    let thin_rule = "-".repeat(80);

    println!("\n{rule}");
    println!("SEARCH PERFORMANCE COMPARISON");
    println!("{rule}");
    println!("\nDataset size: {record_count} transactions");
    println!("Iterations per search: {iterations}");

    for (title, timings) in [("LINEAR SEARCH", linear), ("INDEX LOOKUP", indexed)] {
        println!("\n{thin_rule}");
        println!("{title}");
        println!("{thin_rule}");
        println!("Total time:   {:.6} seconds", timings.total().as_secs_f64());
        println!("Mean time:    {:.6} seconds", timings.mean().as_secs_f64());
        println!("Median time:  {:.6} seconds", timings.median().as_secs_f64());
    }

    let linear_mean = linear.mean().as_secs_f64();
    let indexed_mean = indexed.mean().as_secs_f64();

    println!("\n{rule}");
    if indexed_mean > 0.0 && linear_mean > 0.0 {
        println!(
            "Index lookup is {:.2}x faster than linear search",
            linear_mean / indexed_mean
        );
        println!(
            "Index lookup takes {:.2}% less time",
            (linear_mean - indexed_mean) / linear_mean * 100.0
        );
    } else {
        println!("Lookups were too fast to compare, try more iterations.");
    }
    println!("{rule}");
}
