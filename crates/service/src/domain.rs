//! Records exchanged between the HTTP layer, the services and the stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client-defined calculation fields, kept verbatim.
pub type CalculationFields = Map<String, Value>;

/// A stored calculation: the assigned id plus whatever fields the client sent,
/// serialized side by side as one flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub id: i64,
    #[serde(flatten)]
    pub fields: CalculationFields,
}

/// Request body for creating or replacing a calculation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationInput(pub CalculationFields);

impl CalculationInput {
    /// Drop any client-supplied `id`; identifiers are assigned by the store.
    pub fn into_fields(mut self) -> CalculationFields {
        self.0.remove("id");
        self.0
    }
}

/// A stored user. The password hash never leaves the process in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// What the user store persists on create/update; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub email: String,
    pub password_hash: String,
}

/// Request body for creating or replacing a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}
