//! Idempotent seeding of test data.
//!
//! [`seed_users`] runs the whole flow:
//!
//! 1. the default barbershop
//! 2. per test account: auth user, profile (with role drift correction), barber row
//! 3. per barber: the service catalogue on its shop and a weekly schedule
//! 4. two sample appointments for the test customer
//!
//! Each step checks its natural key first (email, profile id, service name,
//! day of week, appointment notes), so running it again changes nothing.
//! Failures are counted and the run continues.

pub mod appointments;
pub mod models;
pub mod schedule;
pub mod shops;
pub mod users;

use std::collections::HashSet;
use std::time::Instant;

use tracing::{instrument, warn};

use barberpro_backend::{Backend, BackendError, Query, RetryPolicy, rows};
use barberpro_models::{Barber, Profile, Table, UserRole};

pub use appointments::ensure_sample_appointments;
pub use models::{TEST_ACCOUNTS, TestAccount};
pub use schedule::ensure_weekly_schedule;
pub use shops::{ensure_default_barbershop, ensure_default_services, ensure_services};
pub use users::{ClearReport, clear_test_users, ensure_auth_user, ensure_barber, ensure_profile};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Auth accounts created by this run.
    pub created: usize,
    /// Auth accounts that already existed.
    pub existed: usize,
    /// Profiles whose role was corrected.
    pub profiles_fixed: usize,
    pub barbers_created: usize,
    pub services_created: usize,
    pub working_hours_created: usize,
    pub appointments_created: usize,
    pub failures: Vec<String>,
}

impl SeedReport {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, step: &str, err: &BackendError) {
        warn!(step, error = %err, "seed step failed");
        println!("   ❌ {step}: {err}");
        self.failures.push(format!("{step}: {err}"));
    }
}

async fn seed_account<B>(
    backend: &B,
    account: &TestAccount,
    retry: &RetryPolicy,
    report: &mut SeedReport,
) -> Result<Profile, BackendError>
where
    B: Backend + ?Sized,
{
    let (user, created) = ensure_auth_user(backend, account, retry).await?;
    if created {
        report.created += 1;
    } else {
        report.existed += 1;
    }

    let (profile, fixed) = ensure_profile(backend, &user, account).await?;
    if fixed {
        report.profiles_fixed += 1;
    }

    if account.role == UserRole::Barber {
        let (_, created) = ensure_barber(backend, &profile).await?;
        if created {
            report.barbers_created += 1;
        }
    }
    Ok(profile)
}

/// Seeds `accounts` and the data that depends on them.
#[instrument(skip_all, fields(accounts = accounts.len()))]
pub async fn seed_users<B>(backend: &B, accounts: &[TestAccount], retry: &RetryPolicy) -> SeedReport
where
    B: Backend + ?Sized,
{
    let start_time = Instant::now();
    let mut report = SeedReport::default();

    println!("🏪 Ensuring default barbershop...");
    if let Err(err) = ensure_default_barbershop(backend).await {
        report.fail("default barbershop", &err);
    }

    println!("👥 Seeding {} test accounts...", accounts.len());
    let mut customer = None;
    for account in accounts {
        match seed_account(backend, account, retry, &mut report).await {
            Ok(profile) => {
                if account.role == UserRole::Customer && customer.is_none() {
                    customer = Some(profile.id);
                }
            }
            Err(err) => report.fail(account.email, &err),
        }
    }

    println!("✂️  Ensuring services and working hours...");
    let all_barbers = Query::new().order_by("created_at", true);
    match rows::fetch_all::<_, Barber>(backend, Table::Barbers, &all_barbers).await {
        Ok(barbers) => {
            let mut shops_done = HashSet::new();
            for barber in &barbers {
                if shops_done.insert(barber.barbershop_id) {
                    match ensure_services(backend, barber.barbershop_id).await {
                        Ok(n) => report.services_created += n,
                        Err(err) => report.fail("services", &err),
                    }
                }
                match ensure_weekly_schedule(backend, barber.id).await {
                    Ok(n) => report.working_hours_created += n,
                    Err(err) => report.fail("working hours", &err),
                }
            }
        }
        Err(err) => report.fail("list barbers", &err),
    }

    println!("📅 Ensuring sample appointments...");
    match customer {
        Some(customer_id) => match ensure_sample_appointments(backend, customer_id).await {
            Ok(n) => report.appointments_created += n,
            Err(err) => report.fail("appointments", &err),
        },
        None => println!("   - no customer account, skipped"),
    }

    println!(
        "\n✅ Seeding finished in {:?}: {} created, {} existing, {} roles fixed, {} failures",
        start_time.elapsed(),
        report.created,
        report.existed,
        report.profiles_fixed,
        report.failures.len()
    );
    report
}
