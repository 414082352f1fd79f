//! Personal Data Core - credential hashing and log redaction
//!
//! The main entry point for pd-core, handling:
//! - Hashing and verifying credentials
//! - Redacting sensitive fields in log lines
//! - Logging user rows through the redacting formatter
//! - Inspecting database settings

use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pd_core::db::{log_rows, DbConfig, DbError, JsonlRowSource};
use pd_core::exit_codes::ExitCode;
use pd_core::logging::{init_logging, LogConfig, LogLevel};
use pd_credential::{CredentialError, CredentialHasher, DEFAULT_COST};
use pd_redact::{FieldRedactor, RedactionPolicy};

/// Personal Data Core - credential hashing and PII log redaction
#[derive(Parser)]
#[command(name = "pd-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl GlobalOpts {
    /// Level forced by flags, if any. `-q` wins over `-v`.
    fn log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            return Some(LogLevel::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a secret read from the first line of stdin
    Hash(HashArgs),

    /// Verify a secret read from stdin against a stored hash
    Verify(VerifyArgs),

    /// Redact sensitive fields in log lines
    Redact(RedactArgs),

    /// Log user rows (JSON lines) through the redacting logger
    LogRows(LogRowsArgs),

    /// Show database settings resolved from the environment
    DbConfig,
}

#[derive(Args, Debug)]
struct HashArgs {
    /// Work factor
    #[arg(long, default_value_t = DEFAULT_COST)]
    cost: u32,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Stored credential hash
    hash: String,
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// Lines to redact (reads stdin when omitted)
    lines: Vec<String>,
}

#[derive(Args, Debug)]
struct LogRowsArgs {
    /// JSON lines file (reads stdin when omitted)
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(cli.global.log_level());

    let redactor = match FieldRedactor::new(RedactionPolicy::default()) {
        Ok(redactor) => redactor,
        Err(e) => {
            eprintln!("pd-core: {}", e);
            std::process::exit(ExitCode::InternalError.as_i32());
        }
    };

    if let Err(e) = init_logging(&log_config, redactor.clone()) {
        eprintln!("pd-core: {}", e);
    }

    let exit_code = match cli.command {
        Commands::Hash(args) => run_hash(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Redact(args) => run_redact(&args, &redactor),
        Commands::LogRows(args) => run_log_rows(&args),
        Commands::DbConfig => run_db_config(),
    };

    std::process::exit(exit_code.as_i32());
}

/// Read one line from stdin without its line terminator.
fn read_secret() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn credential_exit_code(error: &CredentialError) -> ExitCode {
    match error {
        CredentialError::InvalidHashFormat(_) | CredentialError::InvalidCost(_) => {
            ExitCode::ArgsError
        }
        CredentialError::Encoding(_) => ExitCode::InternalError,
    }
}

fn run_hash(args: &HashArgs) -> ExitCode {
    let hasher = match CredentialHasher::with_cost(args.cost) {
        Ok(hasher) => hasher,
        Err(e) => {
            eprintln!("hash: {}", e);
            return credential_exit_code(&e);
        }
    };

    let secret = match read_secret() {
        Ok(secret) => secret,
        Err(e) => {
            eprintln!("hash: failed to read secret: {}", e);
            return ExitCode::IoError;
        }
    };

    match hasher.hash(&secret) {
        Ok(hash) => {
            println!("{}", hash);
            ExitCode::Clean
        }
        Err(e) => {
            eprintln!("hash: {}", e);
            credential_exit_code(&e)
        }
    }
}

fn run_verify(args: &VerifyArgs) -> ExitCode {
    let secret = match read_secret() {
        Ok(secret) => secret,
        Err(e) => {
            eprintln!("verify: failed to read secret: {}", e);
            return ExitCode::IoError;
        }
    };

    match CredentialHasher::new().verify(&args.hash, &secret) {
        Ok(true) => {
            println!("true");
            ExitCode::Clean
        }
        Ok(false) => {
            println!("false");
            ExitCode::Mismatch
        }
        Err(e) => {
            eprintln!("verify: {}", e);
            credential_exit_code(&e)
        }
    }
}

fn run_redact(args: &RedactArgs, redactor: &FieldRedactor) -> ExitCode {
    if !args.lines.is_empty() {
        for line in &args.lines {
            println!("{}", redactor.redact(line));
        }
        return ExitCode::Clean;
    }

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) => println!("{}", redactor.redact(&line)),
            Err(e) => {
                eprintln!("redact: failed to read input: {}", e);
                return ExitCode::IoError;
            }
        }
    }
    ExitCode::Clean
}

fn run_log_rows(args: &LogRowsArgs) -> ExitCode {
    let result = match &args.file {
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => log_rows(&mut JsonlRowSource::new(BufReader::new(file))),
            Err(e) => {
                eprintln!("log-rows: cannot open {}: {}", path.display(), e);
                return ExitCode::IoError;
            }
        },
        None => log_rows(&mut JsonlRowSource::new(io::stdin().lock())),
    };

    match result {
        Ok(count) => {
            println!("{}", serde_json::json!({ "rows_logged": count }));
            ExitCode::Clean
        }
        Err(DbError::Io(e)) => {
            eprintln!("log-rows: {}", e);
            ExitCode::IoError
        }
        Err(e) => {
            eprintln!("log-rows: {}", e);
            ExitCode::ArgsError
        }
    }
}

fn run_db_config() -> ExitCode {
    match DbConfig::from_env() {
        Ok(config) => match serde_json::to_string_pretty(&config) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::Clean
            }
            Err(e) => {
                eprintln!("db-config: {}", e);
                ExitCode::InternalError
            }
        },
        Err(e) => {
            eprintln!("db-config: {}", e);
            ExitCode::ConfigError
        }
    }
}
