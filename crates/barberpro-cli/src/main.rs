use std::process::ExitCode;

use anyhow::Context;
use barberpro_backend::{RestBackend, RetryPolicy, SqlExecutor};
use barberpro_cli::health::{HealthReport, check_health};
use barberpro_cli::migrate::{self, MigrateOptions, MigrationReport};
use barberpro_cli::seeder::{self, SeedReport, TEST_ACCOUNTS};
use barberpro_cli::setup::{self, FixReport};
use barberpro_config::BackendConfig;
use barberpro_db::PgExecutor;
use barberpro_observability::init_console_logging;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "barberpro-cli")]
#[command(about = "BarberPro CLI - health check, migration and seeding tools", long_about = None)]
struct Cli {
    /// Postgres connection string. Migrations then run over a direct
    /// connection instead of the exec_sql RPC.
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the schema script statement by statement
    AutoMigrate {
        /// Continue past failing statements
        #[arg(long)]
        force: bool,

        /// Schema file to apply instead of the bundled one
        #[arg(long)]
        file: Option<String>,
    },
    /// Check tables and default data
    HealthCheck {
        /// Apply the schema when issues are found
        #[arg(long)]
        fix: bool,

        /// Insert the default barbershop and services
        #[arg(long)]
        pre_seed: bool,

        /// Schema file used by --fix instead of the bundled one
        #[arg(long)]
        file: Option<String>,
    },
    /// Create the test accounts and their dependent records
    SeedUsers,
    /// Check, migrate, pre-seed and seed in one go
    Setup {
        /// Schema file to apply instead of the bundled one
        #[arg(long)]
        file: Option<String>,
    },
    /// Delete the test accounts
    ClearUsers,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_console_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\n❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one command. `Ok(false)` means it completed but reported failures.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = BackendConfig::from_env()?;
    config.require_service_role()?;
    let backend = RestBackend::new(&config).context("could not build backend client")?;
    println!("🔗 Backend: {}", backend.base_url());

    match cli.command {
        Commands::AutoMigrate { force, file } => {
            let executor = sql_executor(&backend, cli.database_url.as_deref()).await?;
            handle_auto_migrate(executor.as_ref(), force, file.as_deref()).await
        }
        Commands::HealthCheck {
            fix,
            pre_seed,
            file,
        } => {
            if fix {
                let executor = sql_executor(&backend, cli.database_url.as_deref()).await?;
                handle_fix(&backend, executor.as_ref(), pre_seed, file.as_deref()).await
            } else {
                handle_health_check(&backend, pre_seed).await
            }
        }
        Commands::SeedUsers => Ok(handle_seed_users(&backend).await),
        Commands::Setup { file } => {
            let executor = sql_executor(&backend, cli.database_url.as_deref()).await?;
            handle_setup(&backend, executor.as_ref(), file.as_deref()).await
        }
        Commands::ClearUsers => {
            let report = seeder::clear_test_users(&backend, &TEST_ACCOUNTS).await;
            println!(
                "\n✅ {} deleted, {} not found, {} failures",
                report.deleted,
                report.not_found,
                report.failures.len()
            );
            Ok(report.failures.is_empty())
        }
    }
}

async fn sql_executor(
    backend: &RestBackend,
    database_url: Option<&str>,
) -> anyhow::Result<Box<dyn SqlExecutor>> {
    match database_url {
        Some(url) => {
            let executor = PgExecutor::connect(url)
                .await
                .context("could not connect with --database-url")?;
            println!("🐘 Using direct database connection");
            Ok(Box::new(executor))
        }
        None => Ok(Box::new(backend.clone())),
    }
}

async fn handle_auto_migrate(
    executor: &dyn SqlExecutor,
    force: bool,
    file: Option<&str>,
) -> anyhow::Result<bool> {
    let script = migrate::load_script(file)?;
    let statements = migrate::split_statements(&script);
    println!(
        "🔨 Applying {} statements via {}...",
        statements.len(),
        executor.describe()
    );

    let options = MigrateOptions {
        force,
        retry: RetryPolicy::default(),
    };
    let report = migrate::apply_migration(executor, &statements, &options).await?;
    print_migration(&report);
    Ok(report.succeeded())
}

async fn handle_health_check(backend: &RestBackend, pre_seed: bool) -> anyhow::Result<bool> {
    if pre_seed {
        let seeded = setup::pre_seed(backend).await?;
        println!(
            "   barbershop created: {}, services created: {}",
            seeded.barbershop_created, seeded.services_created
        );
    }

    println!("🩺 Checking backend health...");
    let report = check_health(backend).await?;
    print_health(&report);
    Ok(report.healthy())
}

async fn handle_fix(
    backend: &RestBackend,
    executor: &dyn SqlExecutor,
    pre_seed: bool,
    file: Option<&str>,
) -> anyhow::Result<bool> {
    let script = migrate::load_script(file)?;
    let report = setup::fix(backend, executor, &script, &MigrateOptions::default(), pre_seed).await?;
    print_fix(&report);
    Ok(report.after.healthy())
}

async fn handle_seed_users(backend: &RestBackend) -> bool {
    let report = seeder::seed_users(backend, &TEST_ACCOUNTS, &RetryPolicy::default()).await;
    print_seed(&report);
    report.succeeded()
}

async fn handle_setup(
    backend: &RestBackend,
    executor: &dyn SqlExecutor,
    file: Option<&str>,
) -> anyhow::Result<bool> {
    let script = migrate::load_script(file)?;
    let report = setup::run_setup(
        backend,
        executor,
        &script,
        &TEST_ACCOUNTS,
        &MigrateOptions::default(),
    )
    .await?;

    print_fix(&report.fix);
    print_seed(&report.seed);
    if report.seed.succeeded() {
        println!("\n🎉 BarberPro is ready. Test accounts:");
        for account in TEST_ACCOUNTS {
            println!("   {:<24} {:<12} ({})", account.email, account.password, account.role);
        }
    }
    Ok(report.seed.succeeded())
}

fn print_health(report: &HealthReport) {
    if report.healthy() {
        println!("✅ All tables and default data present");
        return;
    }
    println!("⚠️  {} issue(s) found:", report.issues.len());
    for issue in &report.issues {
        println!("   - {issue}");
    }
}

fn print_migration(report: &MigrationReport) {
    println!(
        "\n📊 Migration: {} applied, {} skipped, {} errors",
        report.applied, report.skipped, report.errors
    );
    for failure in &report.failures {
        println!("   ❌ #{} {}: {}", failure.position, failure.preview, failure.error);
    }
    if report.halted {
        println!("   Stopped at the first error. Use --force to continue past errors.");
    }
}

fn print_fix(report: &FixReport) {
    println!("\nBefore:");
    print_health(&report.before);
    if let Some(migration) = &report.migration {
        print_migration(migration);
    }
    if let Some(seeded) = &report.pre_seed {
        println!(
            "🌱 Pre-seed: barbershop created: {}, services created: {}",
            seeded.barbershop_created, seeded.services_created
        );
    }
    println!("\nAfter:");
    print_health(&report.after);
}

fn print_seed(report: &SeedReport) {
    println!("\n📊 Seed summary");
    println!("   Accounts created:      {}", report.created);
    println!("   Accounts existing:     {}", report.existed);
    println!("   Profiles fixed:        {}", report.profiles_fixed);
    println!("   Barbers created:       {}", report.barbers_created);
    println!("   Services created:      {}", report.services_created);
    println!("   Working hours created: {}", report.working_hours_created);
    println!("   Appointments created:  {}", report.appointments_created);
    for failure in &report.failures {
        println!("   ❌ {failure}");
    }
}
