//! CLI tool for card scheme detection.
//!
//! # Usage
//!
//! ```bash
//! # Luhn checksum
//! cardscheme luhn 4111111111111111
//!
//! # Parse a rule list
//! cardscheme parse "4,40-49,2221-2720"
//!
//! # Detect the scheme using a local dictionary
//! cardscheme detect 4111111111111111 --dictionary cards-dictionary.json
//!
//! # Detect and check the number against the remote dictionary
//! cardscheme assess 4111111111111111 --output json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use card_scheme::fetch::{
    DictionaryClient, FetchConfig, DEFAULT_DICTIONARY_URL, DEFAULT_MAX_ATTEMPTS,
};
use card_scheme::rule::{format_rules, parse_validation_rules_with};
use card_scheme::{dictionary, find_matching_card_scheme, is_number_valid, SchemeRule};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;

#[derive(Parser)]
#[command(name = "cardscheme")]
#[command(author, version, about = "Card scheme detection and Luhn validation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a card number against the Luhn checksum
    Luhn {
        /// Card number (spaces and dashes allowed)
        card_number: String,
    },

    /// Parse a rule list such as "4,40-49"
    Parse {
        /// Comma-separated rule tokens
        rules: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Detect the scheme of a card number
    Detect {
        /// Card number (spaces and dashes allowed)
        card_number: String,

        #[command(flatten)]
        source: DictionaryArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Detect the scheme and check the Luhn checksum
    Assess {
        /// Card number (spaces and dashes allowed)
        card_number: String,

        #[command(flatten)]
        source: DictionaryArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Args)]
struct DictionaryArgs {
    /// Read the dictionary from a JSON file instead of fetching it
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Dictionary URL
    #[arg(long, env = "CARD_SCHEME_URL", default_value = DEFAULT_DICTIONARY_URL)]
    url: String,

    /// Per-attempt timeout in milliseconds
    #[arg(long, env = "CARD_SCHEME_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,

    /// Total fetch attempts
    #[arg(long, env = "CARD_SCHEME_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: u32,
}

impl DictionaryArgs {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_url(self.url.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_max_attempts(self.attempts)
    }

    async fn load(&self) -> Result<Vec<SchemeRule>, Box<dyn Error>> {
        match &self.dictionary {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(dictionary::parse_response_str(&text)?)
            }
            None => {
                let client = DictionaryClient::new(self.fetch_config())?;
                Ok(client.fetch_rules().await?)
            }
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Parse { rules, output } => cmd_parse(&rules, output),
        Commands::Detect {
            card_number,
            source,
            output,
        } => {
            let schemes = load_or_exit(&source).await;
            cmd_detect(&card_number, &schemes, output);
        }
        Commands::Assess {
            card_number,
            source,
            output,
        } => {
            let schemes = load_or_exit(&source).await;
            cmd_assess(&card_number, &schemes, output);
        }
    }
}

async fn load_or_exit(source: &DictionaryArgs) -> Vec<SchemeRule> {
    match source.load().await {
        Ok(schemes) => schemes,
        Err(e) => {
            eprintln!("Error: could not load dictionary: {}", e);
            std::process::exit(2);
        }
    }
}

/// Drops the separators users commonly type.
fn strip_separators(card_number: &str) -> String {
    card_number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect()
}

fn cmd_luhn(card_number: &str) {
    match is_number_valid(&strip_separators(card_number)) {
        Ok(true) => {
            println!("Luhn check: PASS");
            std::process::exit(0);
        }
        Ok(false) => {
            println!("Luhn check: FAIL");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn cmd_parse(text: &str, output: OutputFormat) {
    let mut errors = Vec::new();
    let rules = parse_validation_rules_with(text, |e| errors.push(e));

    match output {
        OutputFormat::Text => {
            println!("Rules: {}", format_rules(&rules));
            for err in &errors {
                println!("Dropped: {}", err.literal());
            }
        }
        OutputFormat::Json => {
            let dropped: Vec<&str> = errors.iter().map(|e| e.literal()).collect();
            println!("{}", json!({ "rules": rules, "dropped": dropped }));
        }
    }
}

fn cmd_detect(card_number: &str, schemes: &[SchemeRule], output: OutputFormat) {
    let card_number = strip_separators(card_number);
    let scheme = find_matching_card_scheme(&card_number, schemes);

    match output {
        OutputFormat::Text => match scheme {
            Some(s) => {
                println!("Detected Scheme: {} ({})", s.name, s.id);
                println!("Valid Lengths: {}", format_rules(&s.length_validations));
            }
            None => println!("Detected Scheme: Unknown"),
        },
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "scheme": scheme.map(|s| &s.id),
                    "name": scheme.map(|s| &s.name),
                    "icon": scheme.map(|s| &s.icon),
                })
            );
        }
    }

    std::process::exit(if scheme.is_some() { 0 } else { 1 });
}

fn cmd_assess(card_number: &str, schemes: &[SchemeRule], output: OutputFormat) {
    let card_number = strip_separators(card_number);
    let assessment = match card_scheme::assess(&card_number, schemes) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    let acceptable = assessment.is_acceptable(!schemes.is_empty());

    match output {
        OutputFormat::Text => {
            println!(
                "Luhn check: {}",
                if assessment.checksum_valid { "PASS" } else { "FAIL" }
            );
            match &assessment.scheme {
                Some(s) => println!("Scheme: {}", s.name),
                None => println!("Scheme: Unknown"),
            }
            println!("Acceptable: {}", if acceptable { "yes" } else { "no" });
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "checksum_valid": assessment.checksum_valid,
                    "scheme": assessment.scheme.as_ref().map(|s| &s.id),
                    "acceptable": acceptable,
                })
            );
        }
    }

    std::process::exit(if acceptable { 0 } else { 1 });
}
