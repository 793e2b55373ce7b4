//! CLI argument definitions for `loanscore`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "loanscore",
    version,
    about = "Score loan applicants against a remote credit risk model",
    long_about = "Score loan applicants against a remote credit risk model.\n\n\
                  Records are encoded into the model's 13-feature vector locally and sent\n\
                  to the scoring service one at a time. Spreadsheets are scored in order;\n\
                  the run stops as soon as the session expires."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow applicant values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Connection and artifact settings shared by all commands.
#[derive(Args)]
pub struct ServiceArgs {
    /// Scoring service base URL (default: $LOANSCORE_API_URL or http://127.0.0.1:8000).
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Preprocessing artifact (default: the shipped v1 artifact).
    #[arg(long = "preprocess", value_name = "PATH", global = true)]
    pub preprocess: Option<PathBuf>,

    /// Session file holding the bearer token.
    #[arg(long = "session-file", value_name = "PATH", global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the model's features in vector order.
    Fields,

    /// Print the feature vector for a record without calling the service.
    Encode(RecordArgs),

    /// Score a single record.
    Score(RecordArgs),

    /// Score every row of a CSV or JSON file in order.
    Batch(BatchArgs),

    /// Compare the service's models on labelled rows.
    Evaluate(EvaluateArgs),

    /// Log in and store the session token.
    Login(LoginArgs),

    /// Create an account.
    Register(RegisterArgs),

    /// End the session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Check that the service is up and its model is loaded.
    Health,

    /// Estimate a credit score from five ratings.
    CreditScore(CreditScoreArgs),

    /// Record whether a batch applicant has been contacted.
    Annotate(AnnotateArgs),

    /// List recorded contact statuses.
    Contacts(ContactsArgs),
}

#[derive(Args)]
pub struct RecordArgs {
    /// Record as a JSON object, or @FILE to read one from a file.
    #[arg(long = "record", value_name = "JSON|@FILE")]
    pub record: String,

    /// Fill loan_percent_income from loan amount and income when missing.
    #[arg(long = "derive-loan-percent")]
    pub derive_loan_percent: bool,

    /// Print machine-readable JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Applicant file (.csv or .json).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Column holding the applicant name; repeat to try several in order.
    #[arg(long = "name-column", value_name = "COL")]
    pub name_columns: Vec<String>,

    /// Write results to this file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output file extension, else csv).
    #[arg(long = "format", value_enum)]
    pub format: Option<ExportFormatArg>,

    /// Contact log merged into exported results.
    #[arg(long = "contacts", value_name = "PATH")]
    pub contacts: Option<PathBuf>,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Labelled rows (.csv or .json).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long = "username", short = 'u')]
    pub username: String,

    /// Password (read from stdin when omitted).
    #[arg(long = "password")]
    pub password: Option<String>,

    /// Send credentials form-encoded instead of JSON.
    #[arg(long = "form")]
    pub form: bool,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long = "username", short = 'u')]
    pub username: String,

    #[arg(long = "email")]
    pub email: String,

    #[arg(long = "full-name")]
    pub full_name: Option<String>,

    /// Password (read from stdin when omitted).
    #[arg(long = "password")]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct CreditScoreArgs {
    /// On-time payment rate, 0-100.
    #[arg(long = "payment-rate")]
    pub payment_rate: f64,

    /// Credit utilization, 0-100.
    #[arg(long = "utilization")]
    pub utilization: f64,

    /// Length of credit history in years.
    #[arg(long = "history-years")]
    pub history_years: f64,

    /// Credit mix rating, 0-100.
    #[arg(long = "credit-mix")]
    pub credit_mix: f64,

    /// New credit rating, 0-100.
    #[arg(long = "new-credit")]
    pub new_credit: f64,
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// 1-based batch row number.
    #[arg(long = "row")]
    pub row: usize,

    /// Applicant name as shown in the batch results.
    #[arg(long = "name")]
    pub name: String,

    /// contacted, not_contacted or unreachable.
    #[arg(long = "status")]
    pub status: String,

    /// Contact log file.
    #[arg(long = "contacts", value_name = "PATH")]
    pub contacts: Option<PathBuf>,
}

#[derive(Args)]
pub struct ContactsArgs {
    /// Contact log file.
    #[arg(long = "contacts", value_name = "PATH")]
    pub contacts: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
