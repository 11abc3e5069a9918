use crate::core::patch::Patch;
use crate::db::models::{Role, User};
use serde::{Deserialize, Serialize};

// User Management API models

/// Request body for creating a user
///
/// Every field is optional at the wire level so that missing ones can be
/// reported together instead of failing on the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    /// Role name; defaults to `Pasajero`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol: Option<String>,
}

/// Sparse update of a user; only present keys change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub nombre: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub apellido: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub email: Patch<String>,
    /// Re-hashed only when non-empty
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub password: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub telefono: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub direccion: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub pasaporte: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub rol: Patch<String>,
}

/// Query parameters for user search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearchQuery {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub rol: Option<String>,
}

/// User as returned by the API; the password hash is never included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
    pub pasaporte: String,
    pub rol: Role,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nombre: user.nombre,
            apellido: user.apellido,
            email: user.email,
            telefono: user.telefono,
            direccion: user.direccion,
            pasaporte: user.pasaporte,
            rol: user.rol,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for a successful user update
#[derive(Debug, Serialize, Deserialize)]
pub struct UserActionResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Response for a successful user deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub message: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
}
