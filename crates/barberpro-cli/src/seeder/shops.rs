//! Default barbershop and service catalogue.

use tracing::{debug, instrument};

use barberpro_backend::{Backend, BackendError, Query, rows};
use barberpro_models::{
    Barbershop, BarbershopId, DEFAULT_BARBERSHOP_ID, NewService, Service, Table,
};

use super::models::{
    DEFAULT_BARBERSHOP_ADDRESS, DEFAULT_BARBERSHOP_EMAIL, DEFAULT_BARBERSHOP_NAME,
    DEFAULT_BARBERSHOP_PHONE, SERVICE_CATALOGUE,
};

fn default_barbershop() -> Barbershop {
    Barbershop {
        id: DEFAULT_BARBERSHOP_ID,
        name: DEFAULT_BARBERSHOP_NAME.to_string(),
        address: Some(DEFAULT_BARBERSHOP_ADDRESS.to_string()),
        phone: Some(DEFAULT_BARBERSHOP_PHONE.to_string()),
        email: Some(DEFAULT_BARBERSHOP_EMAIL.to_string()),
    }
}

/// Inserts the default barbershop unless present. Returns whether it was created.
#[instrument(skip_all)]
pub async fn ensure_default_barbershop<B>(backend: &B) -> Result<bool, BackendError>
where
    B: Backend + ?Sized,
{
    let query = Query::new().eq("id", DEFAULT_BARBERSHOP_ID);
    let existing: Option<Barbershop> =
        rows::fetch_optional(backend, Table::Barbershops, &query).await?;
    if existing.is_some() {
        debug!("default barbershop present");
        return Ok(false);
    }

    match rows::insert::<_, _, Barbershop>(backend, Table::Barbershops, &default_barbershop()).await
    {
        Ok(_) => {
            println!("   ✓ Created default barbershop");
            Ok(true)
        }
        Err(err) if err.is_already_exists() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Adds every catalogue service missing (by name) from `barbershop_id`.
/// Returns the number created.
#[instrument(skip_all, fields(barbershop_id = %barbershop_id))]
pub async fn ensure_services<B>(backend: &B, barbershop_id: BarbershopId) -> Result<usize, BackendError>
where
    B: Backend + ?Sized,
{
    let query = Query::new().eq("barbershop_id", barbershop_id);
    let existing: Vec<Service> = rows::fetch_all(backend, Table::Services, &query).await?;

    let mut created = 0;
    for seed in SERVICE_CATALOGUE {
        if existing.iter().any(|s| s.name == seed.name) {
            continue;
        }
        let service = NewService {
            barbershop_id,
            name: seed.name.to_string(),
            description: Some(seed.description.to_string()),
            price: seed.price,
            duration_minutes: seed.duration_minutes,
            is_active: true,
        };
        match rows::insert::<_, _, Service>(backend, Table::Services, &service).await {
            Ok(_) => {
                println!("   ✓ Created service {}", seed.name);
                created += 1;
            }
            Err(err) if err.is_already_exists() => {}
            Err(err) => return Err(err),
        }
    }
    Ok(created)
}

pub async fn ensure_default_services<B>(backend: &B) -> Result<usize, BackendError>
where
    B: Backend + ?Sized,
{
    ensure_services(backend, DEFAULT_BARBERSHOP_ID).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberpro_backend::memory::MemoryBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_barbershop_is_created_once() {
        let backend = MemoryBackend::with_schema();

        assert!(ensure_default_barbershop(&backend).await.unwrap());
        assert!(!ensure_default_barbershop(&backend).await.unwrap());
        assert_eq!(backend.row_count(Table::Barbershops), 1);
    }

    #[tokio::test]
    async fn test_services_skip_existing_names() {
        let backend = MemoryBackend::with_schema();
        backend.put_row(
            Table::Services,
            json!({
                "id": "00000000-0000-0000-0000-0000000000a1",
                "barbershop_id": DEFAULT_BARBERSHOP_ID,
                "name": "Barba",
                "description": null,
                "price": 20.0,
                "duration_minutes": 25,
                "is_active": true
            }),
        );

        assert_eq!(ensure_default_services(&backend).await.unwrap(), 2);
        assert_eq!(ensure_default_services(&backend).await.unwrap(), 0);
        assert_eq!(backend.row_count(Table::Services), 3);
    }
}
