//! Roles, users and permissions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::access::error::AccessError;

/// A `resource:action` permission key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    /// View the approval queue.
    #[serde(rename = "approvals:read")]
    ApprovalsRead,
    /// Approve, reject and toggle decisions.
    #[serde(rename = "approvals:approve")]
    ApprovalsApprove,
    /// View the audit log.
    #[serde(rename = "audit_logs:read")]
    AuditLogsRead,
    /// View customers.
    #[serde(rename = "customers:read")]
    CustomersRead,
    /// Create and edit customers.
    #[serde(rename = "customers:write")]
    CustomersWrite,
    /// Delete customers.
    #[serde(rename = "customers:delete")]
    CustomersDelete,
    /// View expenses.
    #[serde(rename = "expenses:read")]
    ExpensesRead,
    /// Raise and edit expenses.
    #[serde(rename = "expenses:write")]
    ExpensesWrite,
    /// Mark expenses paid.
    #[serde(rename = "expenses:pay")]
    ExpensesPay,
    /// View stock levels.
    #[serde(rename = "inventory:read")]
    InventoryRead,
    /// Edit stock.
    #[serde(rename = "inventory:write")]
    InventoryWrite,
    /// Delete stock items.
    #[serde(rename = "inventory:delete")]
    InventoryDelete,
    /// View reports.
    #[serde(rename = "reports:read")]
    ReportsRead,
    /// View settings.
    #[serde(rename = "settings:read")]
    SettingsRead,
    /// Change settings.
    #[serde(rename = "settings:write")]
    SettingsWrite,
    /// View users and roles.
    #[serde(rename = "users:read")]
    UsersRead,
    /// Manage users and roles.
    #[serde(rename = "users:write")]
    UsersWrite,
}

impl Permission {
    /// Every permission, grouped by resource.
    pub const ALL: [Self; 17] = [
        Self::ApprovalsRead,
        Self::ApprovalsApprove,
        Self::AuditLogsRead,
        Self::CustomersRead,
        Self::CustomersWrite,
        Self::CustomersDelete,
        Self::ExpensesRead,
        Self::ExpensesWrite,
        Self::ExpensesPay,
        Self::InventoryRead,
        Self::InventoryWrite,
        Self::InventoryDelete,
        Self::ReportsRead,
        Self::SettingsRead,
        Self::SettingsWrite,
        Self::UsersRead,
        Self::UsersWrite,
    ];

    /// Returns the `resource:action` key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ApprovalsRead => "approvals:read",
            Self::ApprovalsApprove => "approvals:approve",
            Self::AuditLogsRead => "audit_logs:read",
            Self::CustomersRead => "customers:read",
            Self::CustomersWrite => "customers:write",
            Self::CustomersDelete => "customers:delete",
            Self::ExpensesRead => "expenses:read",
            Self::ExpensesWrite => "expenses:write",
            Self::ExpensesPay => "expenses:pay",
            Self::InventoryRead => "inventory:read",
            Self::InventoryWrite => "inventory:write",
            Self::InventoryDelete => "inventory:delete",
            Self::ReportsRead => "reports:read",
            Self::SettingsRead => "settings:read",
            Self::SettingsWrite => "settings:write",
            Self::UsersRead => "users:read",
            Self::UsersWrite => "users:write",
        }
    }

    /// Returns the resource half of the key.
    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.key().split_once(':').map_or(self.key(), |(resource, _)| resource)
    }

    /// Parses a `resource:action` key.
    pub fn parse(key: &str) -> Result<Self, AccessError> {
        let key = key.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or(AccessError::UnknownPermission(key))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A named set of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Role name, unique ignoring case.
    pub name: String,
    /// What the role is for.
    #[serde(default)]
    pub description: String,
    /// Granted permissions.
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl RoleDefinition {
    /// Creates a role.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// An operator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Login email, unique ignoring case.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Names of assigned roles.
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Inactive users hold no permissions.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl UserAccount {
    /// Creates an active user without roles.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            roles: BTreeSet::new(),
            is_active: true,
        }
    }

    fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Roles and users, loaded from and saved to an `AccessStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    /// Role definitions.
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
    /// User accounts.
    #[serde(default)]
    pub users: Vec<UserAccount>,
}

impl Default for AccessState {
    /// Admin, Manager and Staff roles, no users.
    fn default() -> Self {
        use Permission::{
            ApprovalsApprove, ApprovalsRead, AuditLogsRead, CustomersRead, CustomersWrite,
            ExpensesPay, ExpensesRead, ExpensesWrite, InventoryRead, InventoryWrite, ReportsRead,
        };

        Self {
            roles: vec![
                RoleDefinition::new("Admin", "Full access", Permission::ALL),
                RoleDefinition::new(
                    "Manager",
                    "Approves expenses and reads reports",
                    [
                        ApprovalsRead,
                        ApprovalsApprove,
                        AuditLogsRead,
                        CustomersRead,
                        CustomersWrite,
                        ExpensesRead,
                        ExpensesWrite,
                        ExpensesPay,
                        InventoryRead,
                        InventoryWrite,
                        ReportsRead,
                    ],
                ),
                RoleDefinition::new(
                    "Staff",
                    "Raises expenses",
                    [CustomersRead, ExpensesRead, ExpensesWrite, InventoryRead],
                ),
            ],
            users: Vec::new(),
        }
    }
}

impl AccessState {
    /// Looks up a role by name, ignoring case.
    #[must_use]
    pub fn role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.is_named(name))
    }

    /// Looks up a user by email, ignoring case.
    #[must_use]
    pub fn user(&self, email: &str) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.has_email(email))
    }

    fn role_mut(&mut self, name: &str) -> Result<&mut RoleDefinition, AccessError> {
        self.roles
            .iter_mut()
            .find(|r| r.is_named(name))
            .ok_or_else(|| AccessError::UnknownRole(name.to_string()))
    }

    fn user_mut(&mut self, email: &str) -> Result<&mut UserAccount, AccessError> {
        self.users
            .iter_mut()
            .find(|u| u.has_email(email))
            .ok_or_else(|| AccessError::UnknownUser(email.to_string()))
    }

    /// Adds a role. Names are unique ignoring case.
    pub fn add_role(&mut self, role: RoleDefinition) -> Result<(), AccessError> {
        if self.role(&role.name).is_some() {
            return Err(AccessError::DuplicateRole(role.name));
        }
        self.roles.push(role);
        Ok(())
    }

    /// Adds a user. Emails are unique ignoring case and every role must exist.
    pub fn add_user(&mut self, user: UserAccount) -> Result<(), AccessError> {
        if self.user(&user.email).is_some() {
            return Err(AccessError::DuplicateUser(user.email));
        }
        if let Some(missing) = user.roles.iter().find(|r| self.role(r).is_none()) {
            return Err(AccessError::UnknownRole(missing.clone()));
        }
        self.users.push(user);
        Ok(())
    }

    /// Grants a permission to a role. Returns false if it was already granted.
    pub fn grant(&mut self, role: &str, permission: Permission) -> Result<bool, AccessError> {
        Ok(self.role_mut(role)?.permissions.insert(permission))
    }

    /// Revokes a permission from a role. Returns false if it was not granted.
    pub fn revoke(&mut self, role: &str, permission: Permission) -> Result<bool, AccessError> {
        Ok(self.role_mut(role)?.permissions.remove(&permission))
    }

    /// Assigns an existing role to a user.
    pub fn assign_role(&mut self, email: &str, role: &str) -> Result<(), AccessError> {
        let name = self
            .role(role)
            .map(|r| r.name.clone())
            .ok_or_else(|| AccessError::UnknownRole(role.to_string()))?;
        self.user_mut(email)?.roles.insert(name);
        Ok(())
    }

    /// Activates or deactivates a user.
    pub fn set_user_active(&mut self, email: &str, active: bool) -> Result<(), AccessError> {
        self.user_mut(email)?.is_active = active;
        Ok(())
    }

    /// Returns the union of the user's role permissions, or nothing if inactive.
    pub fn permissions_for(&self, email: &str) -> Result<BTreeSet<Permission>, AccessError> {
        let user = self
            .user(email)
            .ok_or_else(|| AccessError::UnknownUser(email.to_string()))?;
        if !user.is_active {
            return Ok(BTreeSet::new());
        }
        Ok(user
            .roles
            .iter()
            .filter_map(|name| self.role(name))
            .flat_map(|role| role.permissions.iter().copied())
            .collect())
    }

    /// Returns true if the user exists, is active and holds `permission`.
    #[must_use]
    pub fn is_allowed(&self, email: &str, permission: Permission) -> bool {
        self.permissions_for(email)
            .is_ok_and(|granted| granted.contains(&permission))
    }
}
