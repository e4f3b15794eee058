//! Sample appointments linking the seeded customer to the first barber.

use chrono::{Days, NaiveTime, Utc};
use tracing::{instrument, warn};

use barberpro_backend::{Backend, BackendError, Query, rows};
use barberpro_models::{Appointment, Barber, NewAppointment, ProfileId, Service, Table};

use super::models::SAMPLE_APPOINTMENTS;

/// Creates the sample appointments not yet present for `customer_id`.
///
/// Uses the earliest barber and the earliest service of that barber's shop.
/// Returns the number created; zero when there is no barber or service yet.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn ensure_sample_appointments<B>(
    backend: &B,
    customer_id: ProfileId,
) -> Result<usize, BackendError>
where
    B: Backend + ?Sized,
{
    let first = Query::new().order_by("created_at", true);
    let Some(barber) = rows::fetch_optional::<_, Barber>(backend, Table::Barbers, &first).await?
    else {
        warn!("no barber available, skipping sample appointments");
        return Ok(0);
    };

    let services = first.clone().eq("barbershop_id", barber.barbershop_id);
    let Some(service) =
        rows::fetch_optional::<_, Service>(backend, Table::Services, &services).await?
    else {
        warn!("no service available, skipping sample appointments");
        return Ok(0);
    };

    let today = Utc::now().date_naive();
    let mut created = 0;
    for sample in SAMPLE_APPOINTMENTS {
        let key = Query::new()
            .eq("customer_id", customer_id)
            .eq("barber_id", barber.id)
            .eq("notes", sample.notes);
        if rows::fetch_optional::<_, Appointment>(backend, Table::Appointments, &key)
            .await?
            .is_some()
        {
            continue;
        }

        let appointment = NewAppointment {
            customer_id,
            barber_id: barber.id,
            service_id: service.id,
            barbershop_id: barber.barbershop_id,
            appointment_date: today
                .checked_add_days(Days::new(sample.days_ahead))
                .unwrap_or(today),
            appointment_time: NaiveTime::from_hms_opt(sample.hour, 0, 0).unwrap_or_default(),
            status: sample.status,
            total_price: service.price,
            notes: Some(sample.notes.to_string()),
        };
        rows::insert::<_, _, Appointment>(backend, Table::Appointments, &appointment).await?;
        println!("   ✓ Created appointment: {}", sample.notes);
        created += 1;
    }
    Ok(created)
}
