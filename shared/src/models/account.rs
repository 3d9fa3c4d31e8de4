//! Account Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Account role
///
/// Closed set; the wire names `farmer` and `admin` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "farmer")]
    Producer,
    Buyer,
    #[serde(alias = "admin")]
    Administrator,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Buyer => "buyer",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "producer" | "farmer" => Ok(Self::Producer),
            "buyer" => Ok(Self::Buyer),
            "administrator" | "admin" => Ok(Self::Administrator),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Account response (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Unix millis
    pub created_at: i64,
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[serde(alias = "name")]
    pub display_name: String,
    /// Defaults to buyer
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub account: AccountResponse,
}

/// Administrator role change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChangeRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_legacy_aliases() {
        let farmer: Role = serde_json::from_str("\"farmer\"").unwrap();
        assert_eq!(farmer, Role::Producer);
        let admin: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(admin, Role::Administrator);
        assert_eq!(serde_json::to_string(&Role::Producer).unwrap(), "\"producer\"");
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn role_from_str_round_trips_display() {
        for role in [Role::Producer, Role::Buyer, Role::Administrator] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert_eq!("farmer".parse::<Role>(), Ok(Role::Producer));
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn register_request_validation() {
        let ok = RegisterRequest {
            email: "alice@x.com".into(),
            password: "secret1".into(),
            display_name: "Alice".into(),
            role: None,
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            email: "not-an-email".into(),
            password: "123".into(),
            display_name: String::new(),
            role: Some(Role::Buyer),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("display_name"));
    }

    #[test]
    fn register_request_accepts_name_alias() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"bob@x.com","password":"secret1","name":"Bob","role":"farmer"}"#,
        )
        .unwrap();
        assert_eq!(req.display_name, "Bob");
        assert_eq!(req.role, Some(Role::Producer));
    }
}
