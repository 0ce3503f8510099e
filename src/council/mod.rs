//! Council membership service.
//!
//! Orchestrates directory verification, the member store, and account roles
//! so that every login in the member roster holds the Administrator role and
//! every removed login is downgraded back to an ordinary user.

use std::sync::Arc;

use crate::db::{MemberCreate, MemberDelete, Repository};
use crate::directory::{DirectoryClient, ExternalProfile};
use crate::errors::{fields, AppError};
use crate::models::{CouncilMember, NewCouncilMember, Role, LOGIN_MAX_LENGTH, LOGIN_MIN_LENGTH};

/// Outcome of a remove operation. Both variants are success to the caller;
/// the distinction only drives the informational message.
#[derive(Debug, PartialEq, Eq)]
pub enum RemovedMember {
    Removed,
    AlreadyAbsent,
}

/// Orchestrator for membership mutations and the roster listing.
pub struct CouncilService {
    repo: Arc<Repository>,
    directory: DirectoryClient,
}

impl CouncilService {
    pub fn new(repo: Arc<Repository>, directory: DirectoryClient) -> Self {
        Self { repo, directory }
    }

    /// Verify a candidate login against the directory and add them to the
    /// council, granting Administrator.
    pub async fn add_member(&self, new_login: &str) -> Result<CouncilMember, AppError> {
        validate_login(new_login)?;

        let Some(profile) = self.directory.lookup(new_login).await? else {
            return Err(AppError::UserNotFound);
        };

        // The stored login is the directory's canonical form, which may
        // differ in case from the submitted one.
        let member = match self.repo.create_member(&member_draft(&profile)).await? {
            MemberCreate::Created(member) => member,
            MemberCreate::DuplicateLogin => return Err(AppError::DuplicateMember),
        };

        // Not transactional with the insert: a failure here leaves the member
        // persisted without the Administrator role, surfaced as a fatal error.
        self.repo.set_role(&member.login, Role::Administrator).await?;

        tracing::info!(login = %member.login, "Added council member");

        Ok(member)
    }

    /// Remove a member and downgrade their role. Removing an absent login is
    /// a success; the role is left untouched in that case.
    pub async fn remove_member(&self, login: &str) -> Result<RemovedMember, AppError> {
        match self.repo.delete_member(login).await? {
            MemberDelete::Deleted => {
                self.repo.set_role(login, Role::Ordinary).await?;
                tracing::info!(login, "Removed council member");
                Ok(RemovedMember::Removed)
            }
            MemberDelete::NotFound => Ok(RemovedMember::AlreadyAbsent),
        }
    }

    /// All members, ordered ascending by first name (case-insensitive).
    pub async fn list_members(&self) -> Result<Vec<CouncilMember>, AppError> {
        let mut members = self.repo.list_members().await?;
        members.sort_by(|a, b| {
            a.first_name
                .to_lowercase()
                .cmp(&b.first_name.to_lowercase())
                .then_with(|| a.login.cmp(&b.login))
        });
        Ok(members)
    }
}

/// Check the login length bounds before any network or store call.
fn validate_login(login: &str) -> Result<(), AppError> {
    let length = login.chars().count();

    if length < LOGIN_MIN_LENGTH {
        return Err(AppError::Validation {
            field: fields::NEW_LOGIN,
            message: format!(
                "Login must be at least {} characters long.",
                LOGIN_MIN_LENGTH
            ),
        });
    }

    if length > LOGIN_MAX_LENGTH {
        return Err(AppError::Validation {
            field: fields::NEW_LOGIN,
            message: format!("Login must be at most {} characters long.", LOGIN_MAX_LENGTH),
        });
    }

    Ok(())
}

fn member_draft(profile: &ExternalProfile) -> NewCouncilMember {
    NewCouncilMember {
        login: profile.login.clone(),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        email: profile.email.clone(),
        profile_picture_url: profile.image.link.clone(),
    }
}
