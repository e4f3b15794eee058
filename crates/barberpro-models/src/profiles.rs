use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BarbershopId, ProfileId};
use crate::roles::UserRole;

/// Application identity row, one per backend-auth account.
///
/// `id` equals the auth user id. Rows are normally created by the
/// `handle_new_user` trigger; the seeder inserts them directly when the trigger
/// did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub barbershop_id: Option<BarbershopId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_backend_row() {
        let json = r#"{
            "id": "11111111-2222-3333-4444-555555555555",
            "email": "cliente@barberpro.com",
            "full_name": null,
            "role": "customer",
            "barbershop_id": null,
            "created_at": "2024-01-15T10:30:00+00:00"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, UserRole::Customer);
        assert!(profile.is_active);
        assert_eq!(profile.display_name(), "cliente@barberpro.com");
    }

    #[test]
    fn test_insert_payload_omits_missing_timestamp() {
        let profile = Profile {
            id: ProfileId::new(),
            email: "admin@barberpro.com".to_string(),
            full_name: Some("Administrador".to_string()),
            role: UserRole::Admin,
            is_active: true,
            barbershop_id: None,
            created_at: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("created_at").is_none());
        assert_eq!(value["role"], "admin");
    }
}
