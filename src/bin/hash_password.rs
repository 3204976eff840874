use std::{collections::BTreeMap, io, process::exit};

use clap::Parser;
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use transaction_registry::PasswordHash;

/// A utility for creating an entry in the server's credentials file.
///
/// Prompts for a password and prints its bcrypt hash. With `--user`, the
/// output is a JSON object that can be used as the credentials file as is.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The user name to pair with the hash in the output.
    #[arg(long)]
    user: Option<String>,

    /// Skip the password strength check.
    #[arg(long)]
    allow_weak: bool,

    /// The bcrypt cost, higher values make the hash slower to check.
    #[arg(long, default_value_t = PasswordHash::DEFAULT_COST)]
    cost: u32,
}

fn main() {
    let args = Args::parse();

    let Some(password_hash) = get_new_password_hash(args.allow_weak, args.cost) else {
        exit(1);
    };

    match args.user {
        Some(user) => {
            let entry = BTreeMap::from([(user, password_hash)]);

            match serde_json::to_string_pretty(&entry) {
                Ok(text) => println!("{text}"),
                Err(error) => {
                    print_error(format!("Could not format credentials: {error}"));
                    exit(1);
                }
            }
        }
        None => println!("{password_hash}"),
    }
}

fn get_new_password_hash(allow_weak: bool, cost: u32) -> Option<PasswordHash> {
    loop {
        let first_password = prompt("Enter a password: ")?;

        if !allow_weak {
            if let Err(advice) = check_strength(&first_password) {
                print_error(format!("Password is too weak: {advice}"));
                continue;
            }
        }

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::hash(&first_password, cost) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}"));
                return None;
            }
        }
    }
}

/// Accept passwords that zxcvbn scores as safely unguessable, otherwise
/// return its advice for a stronger one.
fn check_strength(password: &str) -> Result<(), String> {
    let analysis = zxcvbn(password, &[]);

    match analysis.score() {
        Score::Three | Score::Four => Ok(()),
        _ => Err(analysis
            .feedback()
            .unwrap_or(&Feedback::default())
            .to_string()),
    }
}

/// Read a password without echoing it, `None` if stdin is closed or broken.
fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
