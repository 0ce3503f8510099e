//! Account role model.

/// Authorization role attached to an account.
///
/// Accounts without an explicit record are ordinary users; only council
/// membership (or manual bootstrap) grants Administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    Ordinary,
}

impl Role {
    /// Column value stored in the accounts table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "ADMIN",
            Role::Ordinary => "USER",
        }
    }

    /// Parse a stored column value. Unknown values fall back to ordinary so a
    /// bad row can never grant access.
    pub fn from_column(value: &str) -> Self {
        match value {
            "ADMIN" => Role::Administrator,
            _ => Role::Ordinary,
        }
    }
}
