//! Session and credential types

use serde::{Deserialize, Serialize};

/// The signed-in user, as the backend reports it and as it is snapshotted
/// into local storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(default)]
    pub es_admin: bool,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// `{ "user": ... }` envelope returned by the auth endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUserResponse {
    pub user: User,
}
