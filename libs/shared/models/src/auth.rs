use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller role as carried in the JWT `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Affiliate,
    Specialist,
}

impl Role {
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim {
            "admin" => Some(Role::Admin),
            "affiliate" => Some(Role::Affiliate),
            "specialist" => Some(Role::Specialist),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Affiliate => write!(f, "affiliate"),
            Role::Specialist => write!(f, "specialist"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Authenticated caller, inserted into request extensions by the auth
/// middleware. The auth provider itself is an external collaborator; the
/// core only ever sees this role-tagged identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn is_affiliate(&self) -> bool {
        self.role == Some(Role::Affiliate)
    }

    pub fn is_specialist(&self) -> bool {
        self.role == Some(Role::Specialist)
    }
}
