use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, info_span, warn};

use loanscore_cli::input::{load_record, resolve_password};
use loanscore_cli::render::score_line;
use loanscore_client::{
    ApiClient, ClientConfig, FileTokenStore, LoginEncoding, RegisterRequest, SessionGuard,
};
use loanscore_core::{
    BatchOrchestrator, BatchReport, ContactLog, ContactStatus, CoreError, ExportFormat,
    IdentityExtractor, SingleOptions, default_contacts_path, export_to_path, score_single,
};
use loanscore_ingest::{evaluation_rows, read_records};
use loanscore_model::RowState;
use loanscore_standards::{PreprocessConfig, load_default_preprocess, load_preprocess};
use loanscore_transform::{CreditScoreInputs, derive_loan_percent_income, vectorize_detailed};

use crate::cli::{
    AnnotateArgs, BatchArgs, ContactsArgs, CreditScoreArgs, EvaluateArgs, ExportFormatArg,
    LoginArgs, RecordArgs, RegisterArgs, ServiceArgs,
};
use crate::summary::{
    print_batch, print_contacts, print_evaluation, print_fields, print_issues, print_profile,
    print_vector,
};

/// Exit code when a batch stopped because the session expired.
pub const EXIT_SESSION_EXPIRED: i32 = 2;

fn preprocess_config(service: &ServiceArgs) -> Result<PreprocessConfig> {
    match &service.preprocess {
        Some(path) => load_preprocess(path)
            .with_context(|| format!("load preprocessing artifact {}", path.display())),
        None => load_default_preprocess().context("load default preprocessing artifact"),
    }
}

fn session_guard(service: &ServiceArgs) -> Result<SessionGuard> {
    let store = match &service.session_file {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::open_default().context("locate session file")?,
    };
    debug!(path = %store.path().display(), "using session file");
    Ok(SessionGuard::new(Arc::new(store)))
}

fn api_client(service: &ServiceArgs, encoding: LoginEncoding) -> Result<ApiClient> {
    let mut config = ClientConfig::from_env().with_login_encoding(encoding);
    if let Some(url) = &service.api_url {
        config = config.with_base_url(url);
    }
    if let Some(secs) = service.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    debug!(base_url = %config.base_url, timeout = ?config.timeout, "client configured");
    ApiClient::new(config, session_guard(service)?).context("build HTTP client")
}

fn contact_log(path: Option<&std::path::Path>) -> Result<ContactLog> {
    match path.map(std::path::Path::to_path_buf).or_else(default_contacts_path) {
        Some(path) => ContactLog::open(&path)
            .with_context(|| format!("open contact log {}", path.display())),
        None => {
            warn!("no contact log location available, annotations are not persisted");
            Ok(ContactLog::in_memory())
        }
    }
}

pub fn run_fields(service: &ServiceArgs) -> Result<()> {
    let config = preprocess_config(service)?;
    print_fields(&config);
    Ok(())
}

pub fn run_encode(service: &ServiceArgs, args: &RecordArgs) -> Result<()> {
    let config = preprocess_config(service)?;
    let mut record = load_record(&args.record)?;
    if args.derive_loan_percent {
        derive_loan_percent_income(&mut record);
    }
    let encoded = vectorize_detailed(&config, &record);
    if args.json {
        println!("{}", serde_json::to_string(&encoded.vector)?);
    } else {
        print_vector(&encoded.vector, &encoded.defaults);
    }
    Ok(())
}

pub fn run_score(service: &ServiceArgs, args: &RecordArgs) -> Result<()> {
    let config = preprocess_config(service)?;
    let client = api_client(service, LoginEncoding::default())?;
    let record = load_record(&args.record)?;
    let options = SingleOptions {
        derive_loan_percent: args.derive_loan_percent,
    };
    let scored = match score_single(&client, &config, &record, options) {
        Ok(scored) => scored,
        Err(CoreError::Validation { issues }) => {
            print_issues(&issues);
            bail!("{} field(s) failed validation; nothing was sent", issues.len());
        }
        Err(err) => return Err(err.into()),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&scored.result.raw)?);
    } else {
        if let Some(ratio) = scored.derived_loan_percent {
            println!("loan_percent_income derived as {ratio}");
        }
        println!("{}", score_line(&scored.result));
    }
    Ok(())
}

/// Score a file of applicants. Returns the process exit code.
pub fn run_batch(service: &ServiceArgs, args: &BatchArgs) -> Result<i32> {
    let span = info_span!("batch", input = %args.input.display());
    let _guard = span.enter();

    let config = preprocess_config(service)?;
    let client = api_client(service, LoginEncoding::default())?;
    let records = read_records(&args.input)
        .with_context(|| format!("read applicants from {}", args.input.display()))?;
    if records.is_empty() {
        bail!("{} contains no rows", args.input.display());
    }

    let identity = IdentityExtractor::default().prefer(args.name_columns.iter().cloned());
    let orchestrator = BatchOrchestrator::new(&client, &config).with_identity(identity);
    let run = orchestrator.start(&records)?;

    let progress = if args.no_progress || !io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(records.len() as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    let mut rows = Vec::with_capacity(records.len());
    for row in run {
        if row.state() == RowState::AuthExpired {
            progress.set_message("session expired");
        }
        progress.inc(1);
        rows.push(row);
    }
    progress.finish_and_clear();

    let report = BatchReport::new(rows);
    let contacts = contact_log(args.contacts.as_deref())?;
    print_batch(&report, &contacts);

    if let Some(output) = &args.output {
        let format = match args.format {
            Some(ExportFormatArg::Csv) => ExportFormat::Csv,
            Some(ExportFormatArg::Json) => ExportFormat::Json,
            None => ExportFormat::from_path(output).unwrap_or_default(),
        };
        export_to_path(output, format, &report.rows, &contacts)
            .with_context(|| format!("export results to {}", output.display()))?;
        println!("Results written to {}", output.display());
    }

    if report.session_expired() {
        return Ok(EXIT_SESSION_EXPIRED);
    }
    Ok(0)
}

pub fn run_evaluate(service: &ServiceArgs, args: &EvaluateArgs) -> Result<()> {
    let client = api_client(service, LoginEncoding::default())?;
    let records = read_records(&args.input)
        .with_context(|| format!("read rows from {}", args.input.display()))?;
    if records.is_empty() {
        bail!("{} contains no rows", args.input.display());
    }
    let rows = evaluation_rows(&records);
    info!(rows = rows.len(), "sending rows for evaluation");
    let report = client.evaluate(&rows)?;
    print_evaluation(&report);
    Ok(())
}

pub fn run_login(service: &ServiceArgs, args: &LoginArgs) -> Result<()> {
    let encoding = if args.form {
        LoginEncoding::Form
    } else {
        LoginEncoding::Json
    };
    let client = api_client(service, encoding)?;
    let password = resolve_password(args.password.clone(), io::stdin().lock())?;
    client.login(&args.username, &password)?;
    match client.me() {
        Ok(profile) => debug!(role = ?profile.role, "profile fetched"),
        Err(err) => debug!(error = %err, "could not fetch profile after login"),
    }
    println!("Logged in as {}", args.username);
    Ok(())
}

pub fn run_register(service: &ServiceArgs, args: &RegisterArgs) -> Result<()> {
    let client = api_client(service, LoginEncoding::default())?;
    let password = resolve_password(args.password.clone(), io::stdin().lock())?;
    let profile = client.register(&RegisterRequest {
        username: args.username.clone(),
        email: args.email.clone(),
        password,
        full_name: args.full_name.clone(),
    })?;
    println!("Account created. Log in with: loanscore login -u {}", profile.username);
    print_profile(&profile);
    Ok(())
}

pub fn run_logout(service: &ServiceArgs) -> Result<()> {
    let client = api_client(service, LoginEncoding::default())?;
    if client.logout()? {
        println!("Logged out.");
    } else {
        println!("Logged out locally; the service did not confirm.");
    }
    Ok(())
}

pub fn run_whoami(service: &ServiceArgs) -> Result<()> {
    let client = api_client(service, LoginEncoding::default())?;
    let profile = client.me()?;
    print_profile(&profile);
    Ok(())
}

/// Returns the exit code: 0 when healthy.
pub fn run_health(service: &ServiceArgs) -> Result<i32> {
    let client = api_client(service, LoginEncoding::default())?;
    let health = client.health()?;
    println!(
        "{}: status {}, model {}",
        client.config().base_url,
        health.status,
        if health.model_loaded { "loaded" } else { "not loaded" }
    );
    Ok(if health.is_healthy() { 0 } else { 1 })
}

pub fn run_credit_score(args: &CreditScoreArgs) -> Result<()> {
    let inputs = CreditScoreInputs {
        payment_rate: args.payment_rate,
        utilization: args.utilization,
        history_years: args.history_years,
        credit_mix: args.credit_mix,
        new_credit: args.new_credit,
    };
    let exact = inputs.score()?;
    println!("Credit score: {} ({exact:.2})", inputs.display_score()?);
    Ok(())
}

pub fn run_annotate(args: &AnnotateArgs) -> Result<()> {
    let status: ContactStatus = args.status.parse()?;
    let mut contacts = contact_log(args.contacts.as_deref())?;
    let annotation = contacts.annotate(args.row, &args.name, status).clone();
    contacts.save().context("save contact log")?;
    println!(
        "Row {} ({}): {}",
        annotation.row, annotation.name, annotation.status
    );
    Ok(())
}

pub fn run_contacts(args: &ContactsArgs) -> Result<()> {
    let contacts = contact_log(args.contacts.as_deref())?;
    print_contacts(&contacts);
    Ok(())
}
