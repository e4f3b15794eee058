//! Backend health check.
//!
//! Probes every required table with a bounded read, then the default
//! barbershop row and its service catalogue. Nothing is written.

use std::fmt;

use tracing::{debug, instrument};

use barberpro_backend::{Backend, BackendError, Query, rows};
use barberpro_models::{DEFAULT_BARBERSHOP_ID, Table};

/// Services the default barbershop must offer to count as seeded.
pub const MIN_DEFAULT_SERVICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issue {
    MissingTable(Table),
    MissingDefaultBarbershop,
    MissingDefaultServices,
}

impl Issue {
    pub fn is_missing_table(&self) -> bool {
        matches!(self, Issue::MissingTable(_))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingTable(table) => write!(f, "table:{table}"),
            Issue::MissingDefaultBarbershop => f.write_str("seed:default_barbershop"),
            Issue::MissingDefaultServices => f.write_str("seed:default_services"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub issues: Vec<Issue>,
}

impl HealthReport {
    pub fn healthy(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn missing_tables(&self) -> impl Iterator<Item = Table> + '_ {
        self.issues.iter().filter_map(|issue| match issue {
            Issue::MissingTable(table) => Some(*table),
            _ => None,
        })
    }

    /// Whether the schema has to be migrated before seed data can be fixed.
    pub fn needs_migration(&self) -> bool {
        self.issues.iter().any(Issue::is_missing_table)
    }

    pub fn needs_seed(&self) -> bool {
        self.issues.iter().any(|issue| !issue.is_missing_table())
    }

    pub fn issue_ids(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Reads one row to learn whether `table` exists.
///
/// Only "relation does not exist" answers count as missing; any other failure
/// is returned so callers never remediate on a transport error.
async fn table_exists<B>(backend: &B, table: Table) -> Result<bool, BackendError>
where
    B: Backend + ?Sized,
{
    match backend.select(table, &Query::new().limit(1)).await {
        Ok(_) => Ok(true),
        Err(err) if err.is_missing_relation() => Ok(false),
        Err(err) => Err(err),
    }
}

#[instrument(skip_all)]
pub async fn check_health<B>(backend: &B) -> Result<HealthReport, BackendError>
where
    B: Backend + ?Sized,
{
    let mut report = HealthReport::default();

    for table in Table::ALL {
        let exists = table_exists(backend, table).await?;
        debug!(%table, exists, "table probe");
        if !exists {
            report.issues.push(Issue::MissingTable(table));
        }
    }

    let missing = |table: Table| report.issues.contains(&Issue::MissingTable(table));
    let shops_missing = missing(Table::Barbershops);
    let services_missing = missing(Table::Services);

    let shop_present = if shops_missing {
        false
    } else {
        let query = Query::new().eq("id", DEFAULT_BARBERSHOP_ID);
        !backend.select(Table::Barbershops, &query.limit(1)).await?.is_empty()
    };
    if !shop_present {
        report.issues.push(Issue::MissingDefaultBarbershop);
    }

    // A missing services table is already reported; without the default shop
    // its catalogue cannot exist either.
    let services_ok = if !shop_present {
        false
    } else if services_missing {
        true
    } else {
        let query = Query::new().eq("barbershop_id", DEFAULT_BARBERSHOP_ID);
        rows::count(backend, Table::Services, &query).await? >= MIN_DEFAULT_SERVICES
    };
    if !services_ok {
        report.issues.push(Issue::MissingDefaultServices);
    }

    Ok(report)
}
