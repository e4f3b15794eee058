use tracing::instrument;

use barberpro_backend::{Backend, BackendError, Query, rows};
use barberpro_models::{
    Appointment, Barber, DEFAULT_BARBERSHOP_ID, ProfileId, Service, Table, WorkingHours,
};

#[derive(Debug, Clone)]
pub struct AdminOverview {
    pub counts: Vec<(Table, usize)>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone)]
pub struct BarberAgenda {
    /// `None` when the profile has the barber role but no barber row yet.
    pub barber: Option<Barber>,
    pub hours: Vec<WorkingHours>,
    pub appointments: Vec<Appointment>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone)]
pub struct CustomerOverview {
    pub appointments: Vec<Appointment>,
    pub services: Vec<Service>,
}

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip_all)]
    pub async fn admin_overview(backend: &dyn Backend) -> Result<AdminOverview, BackendError> {
        let mut counts = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            counts.push((table, rows::count(backend, table, &Query::new()).await?));
        }

        let catalogue = Query::new()
            .eq("barbershop_id", DEFAULT_BARBERSHOP_ID)
            .order_by("name", true);
        let services = rows::fetch_all(backend, Table::Services, &catalogue).await?;

        Ok(AdminOverview { counts, services })
    }

    #[instrument(skip_all, fields(profile_id = %profile_id))]
    pub async fn barber_agenda(
        backend: &dyn Backend,
        profile_id: ProfileId,
    ) -> Result<BarberAgenda, BackendError> {
        let by_profile = Query::new().eq("profile_id", profile_id);
        let Some(barber) = rows::fetch_optional::<_, Barber>(backend, Table::Barbers, &by_profile).await? else {
            return Ok(BarberAgenda {
                barber: None,
                hours: Vec::new(),
                appointments: Vec::new(),
                services: Vec::new(),
            });
        };

        let hours = rows::fetch_all(
            backend,
            Table::WorkingHours,
            &Query::new().eq("barber_id", barber.id).order_by("day_of_week", true),
        )
        .await?;
        let appointments = rows::fetch_all(
            backend,
            Table::Appointments,
            &Query::new().eq("barber_id", barber.id).order_by("appointment_date", true),
        )
        .await?;
        let services = rows::fetch_all(
            backend,
            Table::Services,
            &Query::new().eq("barbershop_id", barber.barbershop_id),
        )
        .await?;

        Ok(BarberAgenda {
            barber: Some(barber),
            hours,
            appointments,
            services,
        })
    }

    #[instrument(skip_all, fields(profile_id = %profile_id))]
    pub async fn customer_overview(
        backend: &dyn Backend,
        profile_id: ProfileId,
    ) -> Result<CustomerOverview, BackendError> {
        let appointments = rows::fetch_all(
            backend,
            Table::Appointments,
            &Query::new().eq("customer_id", profile_id).order_by("appointment_date", true),
        )
        .await?;
        let services = rows::fetch_all(
            backend,
            Table::Services,
            &Query::new().eq("is_active", true).order_by("name", true),
        )
        .await?;

        Ok(CustomerOverview {
            appointments,
            services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberpro_backend::RetryPolicy;
    use barberpro_backend::memory::MemoryBackend;
    use barberpro_cli::seeder::{TEST_ACCOUNTS, seed_users};
    use barberpro_models::{Profile, UserRole};

    async fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::with_schema();
        let report = seed_users(&backend, &TEST_ACCOUNTS, &RetryPolicy::none()).await;
        assert!(report.succeeded(), "{:?}", report.failures);
        backend
    }

    async fn profile_id(backend: &MemoryBackend, role: UserRole) -> ProfileId {
        let profile: Profile = rows::fetch_optional(
            backend,
            Table::Profiles,
            &Query::new().eq("role", role.as_str()),
        )
        .await
        .unwrap()
        .unwrap();
        profile.id
    }

    #[tokio::test]
    async fn test_admin_overview_counts_every_table() {
        let backend = seeded().await;

        let overview = DashboardService::admin_overview(&backend).await.unwrap();
        let counts: Vec<usize> = overview.counts.iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, vec![3, 1, 1, 3, 7, 2]);
        let names: Vec<&str> = overview.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Barba", "Corte", "Corte + Barba"]);
    }

    #[tokio::test]
    async fn test_barber_agenda() {
        let backend = seeded().await;
        let barber = profile_id(&backend, UserRole::Barber).await;

        let agenda = DashboardService::barber_agenda(&backend, barber).await.unwrap();
        assert!(agenda.barber.is_some());
        assert_eq!(agenda.hours.len(), 7);
        assert_eq!(agenda.hours[0].day_of_week, 0);
        assert_eq!(agenda.appointments.len(), 2);
        assert_eq!(agenda.services.len(), 3);
    }

    #[tokio::test]
    async fn test_barber_without_barber_row_gets_empty_agenda() {
        let backend = MemoryBackend::with_schema();

        let agenda = DashboardService::barber_agenda(&backend, ProfileId::new()).await.unwrap();
        assert!(agenda.barber.is_none());
        assert!(agenda.hours.is_empty());
    }

    #[tokio::test]
    async fn test_customer_overview() {
        let backend = seeded().await;
        let customer = profile_id(&backend, UserRole::Customer).await;

        let overview = DashboardService::customer_overview(&backend, customer).await.unwrap();
        assert_eq!(overview.appointments.len(), 2);
        assert_eq!(overview.services.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_table_is_an_error() {
        let backend = MemoryBackend::with_schema();
        backend.drop_table(Table::Services);

        let err = DashboardService::admin_overview(&backend).await.unwrap_err();
        assert!(err.is_missing_relation());
    }
}
