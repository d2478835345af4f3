use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_opt_id, parse_optional_timestamp, parse_variant, record_id};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Rider,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Rider => "rider",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }

    /// Where a signed-in user of this role lands by default.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Rider => "/search",
            Role::Company => "/company/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "role",
            s,
            &[
                ("rider", Role::Rider),
                ("user", Role::Rider),
                ("customer", Role::Rider),
                ("company", Role::Company),
                ("operator", Role::Company),
                ("companyadmin", Role::Company),
                ("admin", Role::Admin),
                ("superadmin", Role::Admin),
            ],
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(alias = "username", alias = "fullName")]
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub company_id: Option<String>,
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub company_id: Option<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserDto> for User {
    type Error = ApiError;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        Ok(Self {
            role: dto.role.parse()?,
            created_at: parse_optional_timestamp("createdAt", dto.created_at.as_deref())?,
            id: record_id("user", dto.id, dto.mongo_id)?,
            name: dto.name,
            email: dto.email,
            phone: dto.phone.filter(|p| !p.trim().is_empty()),
            company_id: dto.company_id,
            active: dto.active,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_user_renames_and_defaults() {
        let dto: UserDto = serde_json::from_str(
            r#"{"_id": 7, "username": "Amina W", "email": "amina@example.com",
                "phoneNumber": "", "role": "USER", "createdAt": "2026-01-02T10:00:00"}"#,
        )
        .unwrap();
        let user = User::try_from(dto).unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.name, "Amina W");
        assert_eq!(user.role, Role::Rider);
        assert_eq!(user.phone, None);
        assert!(user.active);
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_user_carrying_both_id_keys() {
        let dto: UserDto = serde_json::from_str(
            r#"{"id": "65aa01", "_id": "65aa01", "username": "Amina W",
                "email": "amina@example.com", "role": "user"}"#,
        )
        .unwrap();
        assert_eq!(User::try_from(dto).unwrap().id, "65aa01");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Company".parse::<Role>().unwrap(), Role::Company);
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("driver".parse::<Role>().is_err());
    }
}
