//! Weekly working hours for barbers.
//!
//! Days are numbered 0 (Sunday) to 6 (Saturday). Sunday is closed; the other
//! days run 09:00 to 18:00 with a lunch break from 12:00 to 13:00.

use chrono::NaiveTime;
use tracing::instrument;

use barberpro_backend::{Backend, BackendError, Query, rows};
use barberpro_models::{BarberId, NewWorkingHours, Table, WorkingHours};

pub const SUNDAY: i16 = 0;
pub const DAYS: std::ops::RangeInclusive<i16> = 0..=6;

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

pub fn default_hours(barber_id: BarberId, day_of_week: i16) -> NewWorkingHours {
    let open = day_of_week != SUNDAY;
    NewWorkingHours {
        barber_id,
        day_of_week,
        start_time: at(9),
        end_time: at(18),
        break_start: open.then(|| at(12)),
        break_end: open.then(|| at(13)),
        is_available: open,
    }
}

/// Adds the default hours for every day `barber_id` has no row for.
/// Returns the number of rows created.
#[instrument(skip_all, fields(barber_id = %barber_id))]
pub async fn ensure_weekly_schedule<B>(backend: &B, barber_id: BarberId) -> Result<usize, BackendError>
where
    B: Backend + ?Sized,
{
    let query = Query::new().eq("barber_id", barber_id);
    let existing: Vec<WorkingHours> = rows::fetch_all(backend, Table::WorkingHours, &query).await?;

    let mut created = 0;
    for day in DAYS {
        if existing.iter().any(|h| h.day_of_week == day) {
            continue;
        }
        match rows::insert::<_, _, WorkingHours>(
            backend,
            Table::WorkingHours,
            &default_hours(barber_id, day),
        )
        .await
        {
            Ok(_) => created += 1,
            Err(err) if err.is_already_exists() => {}
            Err(err) => return Err(err),
        }
    }
    if created > 0 {
        println!("   ✓ Created {created} working-hour rows");
    }
    Ok(created)
}
