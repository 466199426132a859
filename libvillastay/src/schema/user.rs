//! Users and their profile inputs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    Host,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct User {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone_e164: Option<String>,
}

impl User {
    /// Name shown in headers and thread lists
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self.role, Role::Host | Role::Admin)
    }
}

impl Schema for User {
    const ENTITY: &'static str = "User";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl Schema for CreateUserInput {
    const ENTITY: &'static str = "CreateUserInput";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_e164: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Schema for UpdateUserInput {
    const ENTITY: &'static str = "UpdateUserInput";
}
