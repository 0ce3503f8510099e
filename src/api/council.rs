//! Council member API endpoints.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::council::RemovedMember;
use crate::errors::AppError;
use crate::models::{CouncilAction, CouncilMember, RemoveMemberInfo, RemoveMemberResponse};
use crate::AppState;

/// GET /api/council-members - List all members, ordered by first name.
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<CouncilMember>>, AppError> {
    let members = state.council.list_members().await?;
    Ok(Json(members))
}

/// POST /api/council-members - Add or delete a member, selected by the
/// `action` discriminator in the body.
pub async fn mutate_members(
    State(state): State<AppState>,
    Json(action): Json<CouncilAction>,
) -> Result<Response, AppError> {
    match action {
        CouncilAction::Add { new_login } => {
            let member = state.council.add_member(&new_login).await?;
            Ok(Json(member).into_response())
        }
        CouncilAction::Delete { login } => {
            let outcome = state.council.remove_member(&login).await?;
            // Removing an absent member is still a success; the info message
            // lets the form note it without blocking the user.
            let info = match outcome {
                RemovedMember::Removed => None,
                RemovedMember::AlreadyAbsent => Some(RemoveMemberInfo {
                    login: "Council member does not exist".to_string(),
                }),
            };
            Ok(Json(RemoveMemberResponse {
                success: true,
                info,
            })
            .into_response())
        }
    }
}
