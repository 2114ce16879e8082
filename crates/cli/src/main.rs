use anyhow::Context;
use clap::{Parser, Subcommand};
use hrms_cli::config::Settings;
use hrms_cli::editor::{ExternalEditor, GridEditor};
use hrms_cli::menu;
use hrms_cli::prompt::Prompt;
use hrms_cli::views::{self, Status};
use hrms_core::{Age, BloodType, Gender, NewPatient, PatientRecord, RecordService};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hrms")]
#[command(about = "Health record management system")]
struct Cli {
    /// Records file (overrides HRMS_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Show summary metrics
    Dashboard {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List records, optionally filtered by name, phone or ID
    List {
        /// Search text; blank lists everything
        query: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a patient
    Add {
        #[arg(long)]
        name: String,
        /// Age in years (1-120)
        #[arg(long)]
        age: Age,
        /// Male, Female or Other
        #[arg(long)]
        gender: Gender,
        /// A+, A-, B+, B-, AB+, AB-, O+ or O-
        #[arg(long)]
        blood_type: Option<BloodType>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Medical history notes
        #[arg(long)]
        history: Option<String>,
    },
    /// Bulk edit all records in an editor
    Edit {
        /// Apply an already edited grid file instead of opening an editor
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Delete a patient by ID
    Delete {
        id: u64,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hrms_core=warn".parse()?)
                .add_directive("hrms_cli=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env(cli.data_file)?;
    let mut service = RecordService::open(&settings.core).with_context(|| {
        format!(
            "failed to load records from {}",
            settings.core.data_file().display()
        )
    })?;
    let editor = ExternalEditor::new(settings.editor_command.clone());

    let status = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut prompt = Prompt::new(stdin.lock(), stdout.lock());
            menu::run(&mut service, &mut prompt, &editor)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Dashboard { json } => {
            let metrics = service.metrics();
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print!("{}", hrms_cli::render::dashboard(&metrics));
            }
            return Ok(ExitCode::SUCCESS);
        }
        Commands::List { query, json } => {
            let query = query.unwrap_or_default();
            if json {
                let hits: Vec<&PatientRecord> = service.search(&query);
                println!("{}", serde_json::to_string_pretty(&hits)?);
                return Ok(ExitCode::SUCCESS);
            }
            let (body, caption) = views::search_status(&service, &query);
            print!("{body}");
            caption
        }
        Commands::Add {
            name,
            age,
            gender,
            blood_type,
            phone,
            address,
            history,
        } => views::create_status(
            &mut service,
            NewPatient {
                name,
                age: Some(age),
                gender: Some(gender),
                blood_type,
                phone,
                address,
                medical_history: history,
            },
        ),
        Commands::Edit { from } => edit(&mut service, from, &editor)?,
        Commands::Delete { id } => views::delete_status(&mut service, id),
    };

    Ok(report(&status))
}

fn edit(
    service: &mut RecordService,
    from: Option<PathBuf>,
    editor: &dyn GridEditor,
) -> anyhow::Result<Status> {
    let edited = match from {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read grid file {}", path.display()))?,
        None => match views::edit_grid(service, editor) {
            Ok(Some(edited)) => edited,
            Ok(None) => return Ok(Status::Info("No changes.".into())),
            Err(status) => return Ok(status),
        },
    };

    Ok(views::apply_grid_status(service, &edited))
}

fn report(status: &Status) -> ExitCode {
    if status.is_error() {
        eprintln!("{status}");
        ExitCode::FAILURE
    } else {
        println!("{status}");
        ExitCode::SUCCESS
    }
}
