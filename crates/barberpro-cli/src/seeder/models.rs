//! Fixed seed data: test accounts, the default barbershop, the service
//! catalogue and the sample appointments.

use barberpro_models::{AppointmentStatus, UserRole};

/// A test account created through the admin auth API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub full_name: &'static str,
    pub role: UserRole,
}

pub const TEST_ACCOUNTS: [TestAccount; 3] = [
    TestAccount {
        email: "admin@barberpro.com",
        password: "admin123",
        full_name: "Administrador BarberPro",
        role: UserRole::Admin,
    },
    TestAccount {
        email: "barbeiro@barberpro.com",
        password: "barbeiro123",
        full_name: "João Barbeiro",
        role: UserRole::Barber,
    },
    TestAccount {
        email: "cliente@barberpro.com",
        password: "cliente123",
        full_name: "Carlos Cliente",
        role: UserRole::Customer,
    },
];

pub const DEFAULT_BARBERSHOP_NAME: &str = "BarberPro - Barbearia Central";
pub const DEFAULT_BARBERSHOP_ADDRESS: &str = "Rua Principal, 123 - Centro";
pub const DEFAULT_BARBERSHOP_PHONE: &str = "(11) 99999-9999";
pub const DEFAULT_BARBERSHOP_EMAIL: &str = "contato@barberpro.com";

/// Barber profile details for seeded barbers.
pub const BARBER_SPECIALTY: &str = "Cortes clássicos e barba";
pub const BARBER_EXPERIENCE_YEARS: i32 = 5;

/// One entry of the service catalogue every barbershop is seeded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub duration_minutes: i32,
}

pub const SERVICE_CATALOGUE: [ServiceSeed; 3] = [
    ServiceSeed {
        name: "Corte",
        description: "Corte de cabelo masculino",
        price: 25.0,
        duration_minutes: 30,
    },
    ServiceSeed {
        name: "Barba",
        description: "Aparar e modelar a barba",
        price: 15.0,
        duration_minutes: 20,
    },
    ServiceSeed {
        name: "Corte + Barba",
        description: "Corte de cabelo e barba completos",
        price: 35.0,
        duration_minutes: 45,
    },
];

/// An illustrative booking. `notes` doubles as its natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleAppointment {
    pub days_ahead: u64,
    pub hour: u32,
    pub status: AppointmentStatus,
    pub notes: &'static str,
}

pub const SAMPLE_APPOINTMENTS: [SampleAppointment; 2] = [
    SampleAppointment {
        days_ahead: 1,
        hour: 10,
        status: AppointmentStatus::Confirmed,
        notes: "Agendamento de exemplo: corte de manhã",
    },
    SampleAppointment {
        days_ahead: 3,
        hour: 15,
        status: AppointmentStatus::Pending,
        notes: "Agendamento de exemplo: horário da tarde",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_account_per_role() {
        for role in UserRole::ALL {
            assert_eq!(TEST_ACCOUNTS.iter().filter(|a| a.role == role).count(), 1);
        }
    }

    #[test]
    fn test_sample_notes_are_distinct() {
        assert_ne!(SAMPLE_APPOINTMENTS[0].notes, SAMPLE_APPOINTMENTS[1].notes);
    }
}
