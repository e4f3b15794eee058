//! Barbershop-side rows: the shop itself, its barbers, their services and
//! weekly working hours.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ids::{BarberId, BarbershopId, ProfileId, ServiceId, WorkingHoursId};

/// Fixed id of the default barbershop every seeded record hangs off.
pub const DEFAULT_BARBERSHOP_ID: BarbershopId =
    BarbershopId::from_u128(0x550e8400_e29b_41d4_a716_446655440000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barbershop {
    pub id: BarbershopId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    pub id: BarberId,
    pub profile_id: ProfileId,
    pub barbershop_id: BarbershopId,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBarber {
    pub profile_id: ProfileId,
    pub barbershop_id: BarbershopId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<i32>,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub barbershop_id: BarbershopId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i32,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewService {
    pub barbershop_id: BarbershopId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
}

/// One day of a barber's weekly schedule. `day_of_week` is 0 (Sunday) to 6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub id: WorkingHoursId,
    pub barber_id: BarberId,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub break_start: Option<NaiveTime>,
    #[serde(default)]
    pub break_end: Option<NaiveTime>,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWorkingHours {
    pub barber_id: BarberId,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub is_available: bool,
}
