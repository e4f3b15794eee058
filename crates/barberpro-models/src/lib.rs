//! # BarberPro Models
//!
//! Row shapes and domain types shared by the tooling and the web app.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed UUID newtypes
//! - [`roles`]: user roles and their dashboards
//! - [`tables`]: the required backend tables
//! - [`profiles`]: identity rows linked to backend-auth accounts
//! - [`shops`]: barbershops, barbers, services and working hours
//! - [`appointments`]: bookings
//!
//! # Example
//!
//! ```ignore
//! use barberpro_models::{UserRole, DEFAULT_BARBERSHOP_ID};
//!
//! assert_eq!(UserRole::Barber.dashboard_path(), "/barber");
//! ```

pub mod appointments;
pub mod ids;
pub mod profiles;
pub mod roles;
pub mod shops;
pub mod tables;

pub use appointments::{Appointment, AppointmentStatus, NewAppointment};
pub use ids::{AppointmentId, BarberId, BarbershopId, ProfileId, ServiceId, WorkingHoursId};
pub use profiles::Profile;
pub use roles::{ParseRoleError, UserRole};
pub use shops::{
    Barber, Barbershop, DEFAULT_BARBERSHOP_ID, NewBarber, NewService, NewWorkingHours, Service,
    WorkingHours,
};
pub use tables::Table;
