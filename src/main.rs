use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, WrapErr};
use triplet_notation::{Constraint, NotationConfig, NotationError};

/// Convert between triplet notation and constraint state
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// strip only the first disallowed character of each part
    #[clap(long, global = true)]
    strip_first: bool,

    /// log silent rejections to stderr
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical form of a notation
    Normalize { notation: String },
    /// Print the JSON state of a notation
    State {
        notation: String,
        #[clap(long)]
        pretty: bool,
    },
    /// Read a JSON state from FILE (or stdin) and print its notation
    Notation { file: Option<PathBuf> },
    /// Apply an inclusive numeric range to FIELD and print the notation
    Between {
        field: String,
        begin: String,
        end: String,
        /// notation to start from
        #[clap(long, default_value = "")]
        base: String,
    },
    /// List every criterion, incomplete ones included
    Triplets { notation: String },
}

impl Args {
    fn config(&self) -> NotationConfig {
        if self.strip_first {
            NotationConfig::strip_first()
        } else {
            NotationConfig::strip_all()
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn parse_bound(field: &str, raw: &str) -> Result<f64, NotationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| NotationError::NonNumericBound {
            field: field.to_owned(),
            value: raw.to_owned(),
        })
}

fn run(args: Args) -> miette::Result<()> {
    let config = args.config();
    match args.command {
        Command::Normalize { notation } => {
            println!("{}", Constraint::from_notation_with(&notation, config));
        }
        Command::State { notation, pretty } => {
            let state = Constraint::from_notation_with(&notation, config).to_state();
            let json = if pretty {
                serde_json::to_string_pretty(&state)
            } else {
                serde_json::to_string(&state)
            };
            println!("{}", json.map_err(NotationError::from)?);
        }
        Command::Notation { file } => {
            let json = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .map_err(NotationError::from)?;
                    buf
                }
            };
            let state = serde_json::from_str(&json).map_err(NotationError::from)?;
            println!("{}", Constraint::from_state_with(&state, config));
        }
        Command::Between {
            field,
            begin,
            end,
            base,
        } => {
            let begin = parse_bound(&field, &begin)?;
            let end = parse_bound(&field, &end)?;
            let mut constraint = Constraint::from_notation_with(&base, config);
            constraint.set_field_between(&field, begin, end)?;
            println!("{}", constraint);
        }
        Command::Triplets { notation } => {
            for triplet in Constraint::from_notation_with(&notation, config).to_triplets() {
                let marker = if triplet.is_valid() { " " } else { "!" };
                println!(
                    "{marker} {}\t{}\t{}",
                    triplet.field().unwrap_or_default(),
                    triplet.operator().map(|op| op.as_str()).unwrap_or("-"),
                    triplet.operands().join("|"),
                );
            }
        }
    }
    Ok(())
}

pub fn main() -> miette::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::debug!("{:?}", args.command);
    run(args)
}
