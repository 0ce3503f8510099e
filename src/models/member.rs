//! Council member model matching the frontend CouncilMember interface.

use serde::{Deserialize, Serialize};

/// Login length bounds enforced before any directory lookup.
pub const LOGIN_MIN_LENGTH: usize = 3;
pub const LOGIN_MAX_LENGTH: usize = 20;

/// A currently-serving council member, verified against the directory at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouncilMember {
    /// Natural key; immutable once created.
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture_url: String,
    pub created_at: String,
}

/// Column values for a member row about to be inserted. Built from the
/// directory profile, so the login carries the directory's casing.
#[derive(Debug, Clone)]
pub struct NewCouncilMember {
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture_url: String,
}

/// Request body for the mutating council-members endpoint, discriminated by
/// the `action` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CouncilAction {
    #[serde(rename_all = "camelCase")]
    Add { new_login: String },
    #[serde(rename_all = "camelCase")]
    Delete { login: String },
}

/// Response body for the delete action. Always reports success; `info`
/// carries the informational message when the record was already absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<RemoveMemberInfo>,
}

/// Field-scoped informational message for the delete action.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveMemberInfo {
    pub login: String,
}
