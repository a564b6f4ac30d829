//! Bias Audit CLI
//!
//! Entry point for `bias-audit`, handling:
//! - The fairness audit of a COMPAS-style score export
//! - Policy validation and inspection
//! - Report, chart, and HTML output

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use ba_common::error::{format_error_human, StructuredError};
use ba_common::{AuditSummary, Error, OutputFormat, SCHEMA_VERSION};
use ba_config::{resolve_policy, validate_policy, AuditPolicy, PolicyPath, ValidationError};
use ba_core::exit_codes::ExitCode;
use ba_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use ba_core::run_audit;
use ba_report::{
    build_charts, render_markdown, render_text, write_chart, ReportConfig, ReportGenerator,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, info_span, warn};

/// Bias Audit - disparate impact and error-rate parity for risk scores
#[derive(Parser)]
#[command(name = "bias-audit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a policy.json file
    #[arg(long, global = true, env = "BIAS_AUDIT_POLICY")]
    policy: Option<PathBuf>,

    /// Report format on stdout
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the fairness audit over a score export (default command)
    Audit(AuditArgs),

    /// Validate the resolved policy
    Check,

    /// Policy inspection
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct AuditArgs {
    /// Input CSV
    #[arg(default_value = "compas-scores-two-years.csv")]
    input: PathBuf,

    /// Where to write the SVG chart grid
    #[arg(long, default_value = "compas_bias_analysis.svg")]
    chart: PathBuf,

    /// Skip the chart
    #[arg(long)]
    no_chart: bool,

    /// Also write a standalone HTML viewer
    #[arg(long)]
    html: Option<PathBuf>,

    /// Decile score at or above which a subject is high risk
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    threshold: Option<u8>,

    /// Groups to report, comma separated, in report order
    #[arg(long, value_delimiter = ',')]
    groups: Option<Vec<String>>,

    /// Group in the numerator of the disparate impact ratio
    #[arg(long)]
    protected: Option<String>,

    /// Group in the denominator of the disparate impact ratio
    #[arg(long)]
    reference: Option<String>,

    /// Exit with status 1 when any disparity check fails
    #[arg(long)]
    strict: bool,
}

impl Default for AuditArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("compas-scores-two-years.csv"),
            chart: PathBuf::from("compas_bias_analysis.svg"),
            no_chart: false,
            html: None,
            threshold: None,
            groups: None,
            protected: None,
            reference: None,
            strict: false,
        }
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective policy after resolution
    Show,
    /// Print the built-in policy
    Default,
}

/// A failed command: the error to report and the status to exit with.
struct Failure {
    error: Error,
    exit: ExitCode,
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        let exit = ExitCode::for_error(&error);
        Self { error, exit }
    }
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp
                | clap::error::ErrorKind::DisplayVersion
                | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    ExitCode::Clean.into()
                }
                _ => ExitCode::ArgsError.into(),
            };
        }
    };

    let log_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(log_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();
    info!(
        event = event_names::RUN_STARTED,
        stage = %Stage::Init,
        version = env!("CARGO_PKG_VERSION"),
        "bias-audit started"
    );

    let result = match cli.command {
        None => run_audit_command(&cli.global, &AuditArgs::default()),
        Some(Commands::Audit(args)) => run_audit_command(&cli.global, &args),
        Some(Commands::Check) => run_check(&cli.global),
        Some(Commands::Config(args)) => run_config(&cli.global, &args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(failure) => report_failure(&cli.global, &failure),
    };
    info!(
        event = event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        code_name = exit_code.code_name(),
        "bias-audit finished"
    );
    exit_code.into()
}

fn report_failure(global: &GlobalOpts, failure: &Failure) -> ExitCode {
    error!(
        code = failure.error.code(),
        category = %failure.error.category(),
        "{}",
        failure.error
    );
    match global.format {
        OutputFormat::Json => {
            eprintln!("{}", StructuredError::from(&failure.error).to_json_pretty());
        }
        OutputFormat::Summary => {
            eprintln!("[error {}] {}", failure.error.code(), failure.error);
        }
        OutputFormat::Text | OutputFormat::Md => {
            let use_color = std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(&failure.error, use_color));
        }
    }
    failure.exit
}

// ============================================================================
// Policy
// ============================================================================

/// Convert a policy error into the unified error type.
fn policy_error(err: ValidationError) -> Error {
    match err {
        ValidationError::IoError(_) | ValidationError::ParseError(_) => {
            Error::InvalidPolicy(err.to_string())
        }
        other => Error::PolicyValidation(other.to_string()),
    }
}

/// Resolve, read and validate the policy.
fn load_policy(global: &GlobalOpts) -> Result<(AuditPolicy, PolicyPath), Error> {
    let resolved = resolve_policy(global.policy.as_deref());
    let policy = match &resolved.path {
        Some(path) => AuditPolicy::from_file(path).map_err(|e| {
            error!(
                event = event_names::CONFIG_ERROR,
                stage = %Stage::Init,
                path = %path.display(),
                code = e.code(),
                "policy unreadable"
            );
            policy_error(e)
        })?,
        None => {
            debug!(
                event = event_names::CONFIG_DEFAULT_USED,
                stage = %Stage::Init,
                "no policy file found, using built-in policy"
            );
            AuditPolicy::default()
        }
    };
    validate_policy(&policy).map_err(policy_error)?;
    info!(
        event = event_names::CONFIG_LOADED,
        stage = %Stage::Init,
        source = %resolved.source,
        path = ?resolved.path,
        "policy loaded"
    );
    Ok((policy, resolved))
}

/// Apply command-line overrides on top of the loaded policy.
///
/// `--groups` without `--protected`/`--reference` compares the first two
/// listed groups.
fn apply_overrides(mut policy: AuditPolicy, args: &AuditArgs) -> Result<AuditPolicy, Failure> {
    if let Some(threshold) = args.threshold {
        policy = policy.with_high_risk_threshold(threshold);
    }
    if let Some(groups) = &args.groups {
        let groups: Vec<String> = groups
            .iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if let Some(first) = groups.first().cloned() {
            let second = groups.get(1).cloned().unwrap_or_else(|| first.clone());
            policy = policy
                .with_groups(groups)
                .with_protected(first)
                .with_reference(second);
        }
    }
    if let Some(protected) = &args.protected {
        policy = policy.with_protected(protected.clone());
    }
    if let Some(reference) = &args.reference {
        policy = policy.with_reference(reference.clone());
    }
    validate_policy(&policy).map_err(|e| Failure {
        error: Error::PolicyValidation(e.to_string()),
        exit: ExitCode::ArgsError,
    })?;
    Ok(policy)
}

fn report_config(policy: &AuditPolicy) -> ReportConfig {
    ReportConfig::default()
        .with_title(policy.report.title.clone())
        .with_error_rate_guide(policy.report.error_rate_guide)
}

// ============================================================================
// Commands
// ============================================================================

fn run_audit_command(global: &GlobalOpts, args: &AuditArgs) -> Result<ExitCode, Failure> {
    let (policy, _) = load_policy(global)?;
    let policy = apply_overrides(policy, args)?;
    let summary = run_audit(&args.input, &policy)?;
    let config = report_config(&policy);

    match global.format {
        OutputFormat::Text => print!("{}", render_text(&summary, &config)),
        OutputFormat::Md => print!("{}", render_markdown(&summary, &config)),
        OutputFormat::Json => println!("{}", summary.to_json_pretty().map_err(Error::from)?),
        OutputFormat::Summary => println!("{}", summary.one_line()),
    }

    let chart_written = !args.no_chart && write_chart_sink(&args.chart, &summary, &config);
    if chart_written && global.format == OutputFormat::Text {
        println!();
        println!("Visualizations saved as '{}'", args.chart.display());
    }
    if let Some(path) = &args.html {
        write_html_sink(path, &summary, &config);
    }

    if args.strict && summary.disparity.any_failed() {
        warn!(
            stage = %Stage::Disparity,
            "disparity check failed under --strict"
        );
        return Ok(ExitCode::DisparityDetected);
    }
    Ok(ExitCode::Clean)
}

/// Write the SVG grid. A failed write is logged and the run continues.
fn write_chart_sink(path: &Path, summary: &AuditSummary, config: &ReportConfig) -> bool {
    let charts = build_charts(summary, config);
    match write_chart(path, &charts) {
        Ok(()) => {
            info!(
                event = event_names::RENDER_WRITTEN,
                stage = %Stage::Report,
                sink = "svg",
                path = %path.display(),
                "chart written"
            );
            true
        }
        Err(e) => {
            warn!(
                event = event_names::RENDER_FAILED,
                stage = %Stage::Report,
                sink = "svg",
                path = %path.display(),
                error = %e,
                "chart not written"
            );
            false
        }
    }
}

fn write_html_sink(path: &Path, summary: &AuditSummary, config: &ReportConfig) -> bool {
    match ReportGenerator::new(config.clone()).write(path, summary) {
        Ok(()) => {
            info!(
                event = event_names::RENDER_WRITTEN,
                stage = %Stage::Report,
                sink = "html",
                path = %path.display(),
                "HTML report written"
            );
            true
        }
        Err(e) => {
            warn!(
                event = event_names::RENDER_FAILED,
                stage = %Stage::Report,
                sink = "html",
                path = %path.display(),
                error = %e,
                "HTML report not written"
            );
            false
        }
    }
}

fn run_check(global: &GlobalOpts) -> Result<ExitCode, Failure> {
    let (policy, resolved) = load_policy(global)?;
    let source = resolved
        .path
        .as_ref()
        .map(|p| p.display().to_string());

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "ok",
                "policy": {
                    "source": resolved.source.to_string(),
                    "path": source,
                    "schema_version": policy.schema_version,
                    "groups": policy.groups,
                    "protected": policy.comparison.protected,
                    "reference": policy.comparison.reference,
                },
            });
            let json = serde_json::to_string_pretty(&response).map_err(Error::from)?;
            println!("{}", json);
        }
        OutputFormat::Summary => {
            println!("policy: OK ({})", resolved.source);
        }
        OutputFormat::Text | OutputFormat::Md => {
            println!("# bias-audit check");
            println!();
            println!("✓ policy: ok");
            println!("  Source: {}", resolved.source);
            if let Some(path) = &source {
                println!("  Path: {}", path);
            }
            println!(
                "  Comparison: {} vs {} (groups: {})",
                policy.comparison.protected,
                policy.comparison.reference,
                policy.groups.join(", ")
            );
            println!("  High risk: decile score >= {}", policy.high_risk_threshold);
        }
    }
    Ok(ExitCode::Clean)
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> Result<ExitCode, Failure> {
    let policy = match args.command {
        ConfigCommands::Show => load_policy(global)?.0,
        ConfigCommands::Default => AuditPolicy::default(),
    };
    let json = policy.to_json_pretty().map_err(Error::from)?;
    println!("{}", json);
    Ok(ExitCode::Clean)
}
