//! Test accounts: auth user, profile row and barber row.
//!
//! Every step looks up the natural key first and reuses what it finds, so a
//! partially seeded database converges on re-run.

use serde_json::json;
use tracing::{info, instrument, warn};

use barberpro_backend::{
    AuthUser, Backend, BackendError, NewAuthUser, Query, RetryPolicy, rows,
};
use barberpro_models::{
    Barber, DEFAULT_BARBERSHOP_ID, NewBarber, Profile, Table, UserRole,
};

use super::models::{BARBER_EXPERIENCE_YEARS, BARBER_SPECIALTY, TestAccount};

/// Finds the auth account for `account` or creates it.
///
/// Returns the account and whether it was created. Transient creation
/// failures are retried per `retry`; an "already registered" answer from a
/// concurrent run falls back to the lookup.
#[instrument(skip_all, fields(email = account.email))]
pub async fn ensure_auth_user<B>(
    backend: &B,
    account: &TestAccount,
    retry: &RetryPolicy,
) -> Result<(AuthUser, bool), BackendError>
where
    B: Backend + ?Sized,
{
    if let Some(user) = backend.find_user_by_email(account.email).await? {
        println!("   ↺ {} already exists", account.email);
        return Ok((user, false));
    }

    let new_user = NewAuthUser {
        email: account.email.to_string(),
        password: account.password.to_string(),
        email_confirm: true,
        user_metadata: json!({
            "full_name": account.full_name,
            "role": account.role,
        }),
    };

    match retry.run("create auth user", || backend.create_user(&new_user)).await {
        Ok(user) => {
            println!("   ✓ Created {} ({})", account.email, account.role);
            Ok((user, true))
        }
        Err(err) if err.is_already_exists() => {
            warn!("account registered concurrently, looking it up again");
            match backend.find_user_by_email(account.email).await? {
                Some(user) => Ok((user, false)),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

/// Makes sure `user` has a profile carrying `account`'s role.
///
/// Returns the profile and whether its role had to be corrected.
#[instrument(skip_all, fields(email = account.email))]
pub async fn ensure_profile<B>(
    backend: &B,
    user: &AuthUser,
    account: &TestAccount,
) -> Result<(Profile, bool), BackendError>
where
    B: Backend + ?Sized,
{
    let by_id = Query::new().eq("id", user.id);
    let existing: Option<Profile> = rows::fetch_optional(backend, Table::Profiles, &by_id).await?;

    let profile = match existing {
        Some(profile) => profile,
        None => {
            let new_profile = Profile {
                id: user.id,
                email: account.email.to_string(),
                full_name: Some(account.full_name.to_string()),
                role: account.role,
                is_active: true,
                barbershop_id: (account.role != UserRole::Customer).then_some(DEFAULT_BARBERSHOP_ID),
                created_at: None,
            };
            match rows::insert::<_, _, Profile>(backend, Table::Profiles, &new_profile).await {
                Ok(profile) => {
                    println!("   ✓ Created profile for {}", account.email);
                    profile
                }
                // The sign-up trigger got there first.
                Err(err) if err.is_already_exists() => {
                    match rows::fetch_optional(backend, Table::Profiles, &by_id).await? {
                        Some(profile) => profile,
                        None => return Err(err),
                    }
                }
                Err(err) => return Err(err),
            }
        }
    };

    if profile.role == account.role {
        return Ok((profile, false));
    }

    info!(from = %profile.role, to = %account.role, "correcting drifted role");
    backend
        .update(Table::Profiles, &by_id, json!({ "role": account.role }))
        .await?;
    println!(
        "   🔧 Fixed role of {}: {} → {}",
        account.email, profile.role, account.role
    );
    Ok((
        Profile {
            role: account.role,
            ..profile
        },
        true,
    ))
}

/// Creates the barber row for `profile`, or re-activates an existing one.
///
/// Returns the barber and whether it was created.
#[instrument(skip_all, fields(profile_id = %profile.id))]
pub async fn ensure_barber<B>(backend: &B, profile: &Profile) -> Result<(Barber, bool), BackendError>
where
    B: Backend + ?Sized,
{
    let by_profile = Query::new().eq("profile_id", profile.id);
    let barbershop_id = profile.barbershop_id.unwrap_or(DEFAULT_BARBERSHOP_ID);

    if let Some(barber) = rows::fetch_optional::<_, Barber>(backend, Table::Barbers, &by_profile).await? {
        if barber.is_available {
            return Ok((barber, false));
        }
        backend
            .update(Table::Barbers, &by_profile, json!({ "is_available": true }))
            .await?;
        println!("   🔧 Re-activated barber {}", profile.email);
        return Ok((
            Barber {
                is_available: true,
                ..barber
            },
            false,
        ));
    }

    let new_barber = NewBarber {
        profile_id: profile.id,
        barbershop_id,
        specialty: Some(BARBER_SPECIALTY.to_string()),
        experience_years: Some(BARBER_EXPERIENCE_YEARS),
        is_available: true,
    };
    match rows::insert::<_, _, Barber>(backend, Table::Barbers, &new_barber).await {
        Ok(barber) => {
            println!("   ✓ Created barber record for {}", profile.email);
            Ok((barber, true))
        }
        Err(err) if err.is_already_exists() => {
            match rows::fetch_optional(backend, Table::Barbers, &by_profile).await? {
                Some(barber) => Ok((barber, false)),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub deleted: usize,
    pub not_found: usize,
    pub failures: Vec<String>,
}

/// Deletes the auth accounts of `accounts`. Their profiles and barber rows
/// go with them through the schema's cascades.
#[instrument(skip_all)]
pub async fn clear_test_users<B>(backend: &B, accounts: &[TestAccount]) -> ClearReport
where
    B: Backend + ?Sized,
{
    println!("🧹 Removing {} test accounts...", accounts.len());
    let mut report = ClearReport::default();

    for account in accounts {
        let result = match backend.find_user_by_email(account.email).await {
            Ok(Some(user)) => backend.delete_user(user.id).await.map(|()| true),
            Ok(None) => Ok(false),
            Err(err) => Err(err),
        };
        match result {
            Ok(true) => {
                println!("   ✓ Deleted {}", account.email);
                report.deleted += 1;
            }
            Ok(false) => {
                println!("   - {} not found", account.email);
                report.not_found += 1;
            }
            Err(err) => {
                warn!(email = account.email, error = %err, "could not delete test account");
                report.failures.push(format!("{}: {err}", account.email));
            }
        }
    }
    report
}
