//! Database repository for membership, account-role, and session operations.
//!
//! Store operations report expected outcomes (duplicate login, missing row)
//! as values rather than errors, so business logic never inspects driver
//! error codes.

use chrono::Utc;
use sqlx::error::DatabaseError;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CouncilMember, NewCouncilMember, Role};

/// Outcome of a member insert.
#[derive(Debug)]
pub enum MemberCreate {
    Created(CouncilMember),
    /// The uniqueness constraint rejected the row.
    DuplicateLogin,
}

/// Outcome of a member delete. Absence is an expected outcome, not an error.
#[derive(Debug, PartialEq, Eq)]
pub enum MemberDelete {
    Deleted,
    NotFound,
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List all members, in storage order. Ordering for display happens at
    /// read time in the service layer.
    pub async fn list_members(&self) -> Result<Vec<CouncilMember>, AppError> {
        let rows = sqlx::query(
            "SELECT login, first_name, last_name, email, profile_picture_url, created_at FROM council_members"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| member_from_row(&row)).collect())
    }

    /// Insert a new member. A duplicate login is detected through the
    /// primary-key violation, never a prior read.
    pub async fn create_member(&self, new: &NewCouncilMember) -> Result<MemberCreate, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO council_members (login, first_name, last_name, email, profile_picture_url, created_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&new.login)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.profile_picture_url)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(MemberCreate::Created(CouncilMember {
                login: new.login.clone(),
                first_name: new.first_name.clone(),
                last_name: new.last_name.clone(),
                email: new.email.clone(),
                profile_picture_url: new.profile_picture_url.clone(),
                created_at: now,
            })),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(MemberCreate::DuplicateLogin)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a member by login.
    pub async fn delete_member(&self, login: &str) -> Result<MemberDelete, AppError> {
        let result = sqlx::query("DELETE FROM council_members WHERE login = ?")
            .bind(login)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(MemberDelete::NotFound);
        }

        Ok(MemberDelete::Deleted)
    }

    // ==================== ACCOUNT ROLE OPERATIONS ====================

    /// Upsert the role of an account. Creates the account row if absent;
    /// otherwise only the role column changes.
    pub async fn set_role(&self, account_id: &str, role: Role) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO accounts (id, role) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET role = excluded.role"
        )
        .bind(account_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Role of an account. Accounts without a row are ordinary users.
    pub async fn role_of(&self, account_id: &str) -> Result<Role, AppError> {
        let row = sqlx::query("SELECT role FROM accounts WHERE id = ?")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(|r| Role::from_column(r.get("role")))
            .unwrap_or(Role::Ordinary))
    }

    // ==================== SESSION OPERATIONS ====================

    /// Issue a new opaque session token for a login.
    pub async fn create_session(&self, login: &str) -> Result<String, AppError> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO sessions (token, login, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(login)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(token)
    }

    /// Resolve a session token to its login, if the session exists.
    pub async fn session_login(&self, token: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT login FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("login")))
    }
}

// Helper functions for row conversion

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> CouncilMember {
    CouncilMember {
        login: row.get("login"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        profile_picture_url: row.get("profile_picture_url"),
        created_at: row.get("created_at"),
    }
}
