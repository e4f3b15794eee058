//! Health-check remediation and the full setup flow.

use thiserror::Error;
use tracing::{info, instrument};

use barberpro_backend::{Backend, BackendError, SqlExecutor};

use crate::health::{HealthReport, check_health};
use crate::migrate::{MigrateError, MigrateOptions, MigrationReport, apply_migration, split_statements};
use crate::seeder::{self, SeedReport, TestAccount};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("health check failed: {0}")]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Migrate(#[from] MigrateError),
    #[error("migration finished with {errors} failed statement(s)")]
    MigrationFailed { errors: usize },
    #[error("backend still unhealthy: {}", .0.join(", "))]
    Unhealthy(Vec<String>),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PreSeedReport {
    pub barbershop_created: bool,
    pub services_created: usize,
}

/// Inserts the default barbershop and its service catalogue when missing.
pub async fn pre_seed<B>(backend: &B) -> Result<PreSeedReport, BackendError>
where
    B: Backend + ?Sized,
{
    println!("🌱 Pre-seeding default data...");
    Ok(PreSeedReport {
        barbershop_created: seeder::ensure_default_barbershop(backend).await?,
        services_created: seeder::ensure_default_services(backend).await?,
    })
}

#[derive(Debug)]
pub struct FixReport {
    pub before: HealthReport,
    pub migration: Option<MigrationReport>,
    pub pre_seed: Option<PreSeedReport>,
    pub after: HealthReport,
}

/// Checks health, migrates when unhealthy, optionally pre-seeds, and checks
/// again.
#[instrument(skip_all, fields(pre_seed = with_pre_seed))]
pub async fn fix<B, E>(
    backend: &B,
    executor: &E,
    script: &str,
    options: &MigrateOptions,
    with_pre_seed: bool,
) -> Result<FixReport, SetupError>
where
    B: Backend + ?Sized,
    E: SqlExecutor + ?Sized,
{
    let before = check_health(backend).await?;

    let migration = if before.healthy() {
        None
    } else {
        println!("🔨 Applying schema ({} issues found)...", before.issues.len());
        let statements = split_statements(script);
        let report = apply_migration(executor, &statements, options).await?;
        if !report.succeeded() {
            return Err(SetupError::MigrationFailed {
                errors: report.errors,
            });
        }
        Some(report)
    };

    let pre_seeded = if with_pre_seed {
        Some(pre_seed(backend).await?)
    } else {
        None
    };

    let after = if migration.is_none() && pre_seeded.is_none() {
        before.clone()
    } else {
        check_health(backend).await?
    };
    info!(before = before.issues.len(), after = after.issues.len(), "remediation finished");

    Ok(FixReport {
        before,
        migration,
        pre_seed: pre_seeded,
        after,
    })
}

#[derive(Debug)]
pub struct SetupReport {
    pub fix: FixReport,
    pub seed: SeedReport,
}

/// Full flow: check, migrate if needed, pre-seed, then seed the test accounts.
///
/// Seeding only starts once the backend reports healthy.
pub async fn run_setup<B, E>(
    backend: &B,
    executor: &E,
    script: &str,
    accounts: &[TestAccount],
    options: &MigrateOptions,
) -> Result<SetupReport, SetupError>
where
    B: Backend + ?Sized,
    E: SqlExecutor + ?Sized,
{
    let fixed = fix(backend, executor, script, options, true).await?;
    if !fixed.after.healthy() {
        return Err(SetupError::Unhealthy(fixed.after.issue_ids()));
    }

    let seed = seeder::seed_users(backend, accounts, &options.retry).await;
    Ok(SetupReport { fix: fixed, seed })
}
