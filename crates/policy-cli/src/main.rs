mod config;
mod wizard;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{AppConfig, Overrides};
use policy_export::{ExportError, ExportFormat, ExportOptions, export};
use policy_spec::{
    AnswersRecord, Clock, DraftStore, FileDraftStore, FixedClock, FormSession, GeneratedPolicy,
    SavedPolicy, SystemClock, ValidationResult, answers_schema, defaults, generate,
    render_markdown, render_text, validate,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wizard::{Verbosity, Wizard, WizardOutcome, describe_errors};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Privacy policy generator",
    long_about = "Walks through the privacy policy questionnaire and exports the generated policy as PDF or DOCX"
)]
struct Cli {
    /// TOML config file (defaults to POLICYGEN_CONFIG).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory holding the autosaved draft.
    #[arg(long, global = true, value_name = "DIR")]
    draft_dir: Option<PathBuf>,
    /// Delay between the last edit and the draft write.
    #[arg(long, global = true, value_name = "MS")]
    autosave_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            config: self.config.clone(),
            draft_dir: self.draft_dir.clone(),
            autosave_interval_ms: self.autosave_ms,
            ..Overrides::default()
        };
        if let Command::Wizard { export, .. } | Command::Generate { export, .. } = &self.command {
            overrides.output_dir = export.out.clone();
            overrides.paid = export.paid;
        }
        overrides
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatChoice {
    Pdf,
    Docx,
    All,
}

impl FormatChoice {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatChoice::Pdf => vec![ExportFormat::Pdf],
            FormatChoice::Docx => vec![ExportFormat::Docx],
            FormatChoice::All => ExportFormat::ALL.to_vec(),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Preview {
    None,
    Text,
    Markdown,
}

#[derive(Args)]
struct ExportArgs {
    /// Export format.
    #[arg(long, value_enum, default_value_t = FormatChoice::All)]
    format: FormatChoice,
    /// Directory the exports are written to.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Export without the free-tier watermark.
    #[arg(long)]
    paid: bool,
    /// Skip writing export files.
    #[arg(long)]
    no_export: bool,
    /// Print the policy to stdout.
    #[arg(long, value_enum, default_value_t = Preview::None)]
    preview: Preview,
    /// Also write the saved-policy record (CBOR) to this path.
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer the questionnaire interactively, then export the policy.
    Wizard {
        /// Show progress, visible fields and parse expectations.
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also print the submitted answers as JSON.
        #[arg(long)]
        answers_json: bool,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Generate and export a policy from an answers JSON file.
    Generate {
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Generate even when the answers fail validation.
        #[arg(long)]
        allow_invalid: bool,
        /// Fixed "last updated" date instead of today.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Validate an answers JSON file.
    Validate {
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the default answers record.
    Defaults,
    /// Print the JSON schema of the answers record.
    Schema,
    /// Inspect or remove the autosaved draft.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the saved draft as JSON.
    Show,
    /// Delete the saved draft.
    Clear,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load(&cli.overrides())?;

    match cli.command {
        Command::Wizard {
            verbose,
            answers_json,
            export,
        } => run_wizard(&config, verbose, answers_json, &export),
        Command::Generate {
            answers,
            allow_invalid,
            date,
            export,
        } => run_generate(&config, &answers, allow_invalid, date, &export),
        Command::Validate { answers } => run_validate(&answers),
        Command::Defaults => print_json(&defaults().to_value()),
        Command::Schema => print_json(&answers_schema()),
        Command::Draft { action } => run_draft(&config, action),
    }
}

fn run_wizard(
    config: &AppConfig,
    verbose: bool,
    answers_json: bool,
    args: &ExportArgs,
) -> CliResult<()> {
    let store = FileDraftStore::new(config.draft_dir.clone());
    let session = FormSession::start(store, config.autosave_interval());
    let stdin = io::stdin();
    let mut wizard = Wizard::new(
        session,
        stdin.lock(),
        io::stdout(),
        Verbosity::from_verbose(verbose),
    );
    let answers = match wizard.run()? {
        WizardOutcome::Submitted(answers) => answers,
        WizardOutcome::Aborted => return Err("wizard aborted by user".into()),
    };

    if answers_json {
        println!("{}", serde_json::to_string_pretty(&answers)?);
    }
    let policy = generate(&answers, &SystemClock);
    publish(config, &policy, &answers, args)
}

fn run_generate(
    config: &AppConfig,
    answers_path: &Path,
    allow_invalid: bool,
    date: Option<NaiveDate>,
    args: &ExportArgs,
) -> CliResult<()> {
    let answers = read_answers(answers_path)?;
    let result = validate(&answers);
    if !result.valid {
        describe_validation(&result)?;
        if !allow_invalid {
            return Err("answers failed validation; fix them or pass --allow-invalid".into());
        }
    }

    let clock: Box<dyn Clock> = match date {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    let policy = generate(&answers, clock.as_ref());
    publish(config, &policy, &answers, args)
}

fn publish(
    config: &AppConfig,
    policy: &GeneratedPolicy,
    answers: &AnswersRecord,
    args: &ExportArgs,
) -> CliResult<()> {
    let options = ExportOptions::from_subscription(Some(config.paid));
    match args.preview {
        Preview::None => {}
        Preview::Text => println!("{}", render_text(policy, options.paid)),
        Preview::Markdown => println!("{}", render_markdown(policy, options.paid)?),
    }

    if let Some(path) = &args.record {
        let record = SavedPolicy::new(policy.clone(), answers.clone());
        fs::write(path, record.to_cbor()?)?;
        println!("Saved policy record to {}", path.display());
    }

    if args.no_export {
        return Ok(());
    }
    let formats = args.format.formats();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let exports = write_exports(
        policy,
        &answers.general.business_name,
        &formats,
        options,
        &config.output_dir,
    );
    match runtime.block_on(exports) {
        Ok(paths) => {
            for path in paths {
                println!("Exported {}", path.display());
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Failed to export the policy: {err}");
            Err(err.into())
        }
    }
}

async fn write_exports(
    policy: &GeneratedPolicy,
    business_name: &str,
    formats: &[ExportFormat],
    options: ExportOptions,
    out: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let export = export(policy, business_name, *format, options).await?;
        written.push(export.write_to(out).await?);
    }
    info!(count = written.len(), "exports written");
    Ok(written)
}

fn run_validate(answers_path: &Path) -> CliResult<()> {
    let answers = read_answers(answers_path)?;
    let result = validate(&answers);
    println!(
        "Validation result: {}",
        if result.valid { "valid" } else { "invalid" }
    );
    describe_validation(&result)?;

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) -> CliResult<()> {
    let mut stdout = io::stdout();
    if !result.errors.is_empty() {
        writeln!(stdout, "Errors:")?;
        describe_errors(&mut stdout, result)?;
    }
    if !result.missing_required.is_empty() {
        writeln!(
            stdout,
            "Missing required answers: {}",
            result.missing_required.join(", ")
        )?;
    }
    Ok(())
}

fn run_draft(config: &AppConfig, action: DraftAction) -> CliResult<()> {
    let mut store = FileDraftStore::new(config.draft_dir.clone());
    match action {
        DraftAction::Show => match store.load()? {
            Some(draft) => print_json(&draft.to_value()),
            None => {
                println!("No draft saved in {}", store.dir().display());
                Ok(())
            }
        },
        DraftAction::Clear => {
            store.clear()?;
            println!("Draft cleared.");
            Ok(())
        }
    }
}

fn read_answers(path: &Path) -> CliResult<AnswersRecord> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_json(value: &serde_json::Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
