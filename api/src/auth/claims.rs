use db::models::user::Role;
use serde::{Deserialize, Serialize};

/// Per-request session identity: user id, role, and token expiry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
