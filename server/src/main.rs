use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, Utc};
use clap::{Args, Parser, Subcommand};
use hub_server::{
    AppConfig, AppState, ServeConfig,
    commands::{directory_export, render_month},
    schema_sdl, serve,
};
use platform_db::{DatabaseSettings, SeaStore, migrate_down, migrate_up, pending_migrations, seed::seed_demo};
use platform_obs::{ObsConfig, init_tracing};
use products_calendar::{EventStore, MonthCursor};
use products_directory::{Branch, Department, FilterCriteria, OnboardingStatus, Selector};
use sea_orm::DatabaseConnection;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hub", version, about = "Lending Heights Hub: team directory and company calendar")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the demo roster and calendar when the database is empty.
    Seed,
    /// Write the directory as CSV.
    Export(ExportCommand),
    /// Print a month grid with its events.
    Calendar(CalendarCommand),
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[derive(Args, Debug)]
struct ExportCommand {
    /// Destination file; defaults to the dated export name in the current directory.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(long, default_value = "")]
    search: String,
    /// Department label, or `All`.
    #[arg(long, default_value = "All")]
    department: String,
    /// Branch label, or `All`.
    #[arg(long, default_value = "All")]
    branch: String,
    /// Onboarding status label, or `All`.
    #[arg(long, default_value = "All")]
    status: String,
}

impl ExportCommand {
    fn criteria(&self) -> Result<FilterCriteria> {
        Ok(FilterCriteria {
            search: self.search.trim().to_string(),
            department: Selector::<Department>::parse(&self.department)?,
            branch: Selector::<Branch>::parse(&self.branch)?,
            onboarding_status: Selector::<OnboardingStatus>::parse(&self.status)?,
        })
    }
}

#[derive(Args, Debug)]
struct CalendarCommand {
    /// Month number, 1-12. Defaults to the current month.
    #[arg(long, requires = "year")]
    month: Option<u32>,
    #[arg(long, requires = "month")]
    year: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let _guard = init_tracing(ObsConfig::default().with_otlp_endpoint(config.otlp_endpoint.clone()))?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Migrate(action) => {
            let db = connect(&config).await?;
            match action {
                MigrateCommand::Up => {
                    migrate_up(&db).await?;
                    info!("database migrations applied");
                }
                MigrateCommand::Down => {
                    migrate_down(&db, Some(1)).await?;
                    info!("most recent migration rolled back");
                }
            }
            Ok(())
        }
        Command::Seed => run_seed(&config).await,
        Command::Export(cmd) => run_export(cmd, &config).await,
        Command::Calendar(cmd) => run_calendar(cmd, &config).await,
        Command::SchemaPrint { output } => schema_print(output),
    }
}

async fn connect(config: &AppConfig) -> Result<DatabaseConnection> {
    let settings = match &config.database_url {
        Some(url) => DatabaseSettings::with_url(url),
        None => DatabaseSettings::default(),
    };
    settings.connect().await.context("connecting to the database")
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let db = connect(&config).await?;
    let pending = pending_migrations(&db).await?;
    if pending > 0 && !cmd.allow_dirty {
        bail!(
            "{pending} pending migration(s); run `hub migrate up` or pass --allow-dirty"
        );
    }
    let state = AppState::new(config, db).await?;
    serve(ServeConfig::from(&cmd), state).await
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let db = connect(config).await?;
    migrate_up(&db).await?;
    let summary = seed_demo(&SeaStore::new(db), Local::now().date_naive()).await?;
    if summary.skipped {
        println!("database already has teammates; nothing seeded");
    } else {
        println!(
            "seeded {} teammates and {} events",
            summary.teammates.len(),
            summary.events
        );
    }
    Ok(())
}

async fn run_export(cmd: ExportCommand, config: &AppConfig) -> Result<()> {
    let criteria = cmd.criteria()?;
    let store = SeaStore::new(connect(config).await?);
    let export = directory_export(&store, &criteria, &config.export_slug, Utc::now().date_naive())
        .await
        .context("exporting the directory")?;
    let target = cmd.output.unwrap_or_else(|| PathBuf::from(&export.filename));
    tokio::fs::write(&target, export.body.as_bytes())
        .await
        .with_context(|| format!("writing {}", target.display()))?;
    println!("wrote {}", target.display());
    Ok(())
}

async fn run_calendar(cmd: CalendarCommand, config: &AppConfig) -> Result<()> {
    let today = Local::now().date_naive();
    let cursor = match (cmd.month, cmd.year) {
        (Some(month), Some(year)) => {
            let month0 = month
                .checked_sub(1)
                .with_context(|| format!("month must be 1-12, got {month}"))?;
            MonthCursor::new(month0, year)?
        }
        _ => MonthCursor::containing(today),
    };
    let grid = cursor.grid()?;
    let store = SeaStore::new(connect(config).await?);
    let events = store.list_month(cursor.month0(), cursor.year()).await?;
    print!("{}", render_month(&grid, &events, today));
    if today.year() == cursor.year() && today.month0() == cursor.month0() {
        let upcoming = store.upcoming(today, products_calendar::DEFAULT_UPCOMING_LIMIT).await?;
        println!("\n{} upcoming event(s)", upcoming.len());
    }
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let sdl = schema_sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl).with_context(|| format!("writing {}", target.display()))?;
            info!(path = %target.display(), "schema written");
        }
        None => print!("{sdl}"),
    }
    Ok(())
}
