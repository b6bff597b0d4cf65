use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest plaintext password accepted from the registration and edit forms.
pub const PASSWORD_MAX_LEN: usize = 64;

/// Employee account.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: i32,
    pub code: String,
    pub name: String,
    /// Argon2id PHC string, never the plaintext.
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fields of an employee that does not have an id yet.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub code: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Administrator flag (`0` general, `1` admin in storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    General,
    Admin,
}

impl Role {
    pub fn from_flag(flag: i32) -> Option<Self> {
        match flag {
            0 => Some(Self::General),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn flag(self) -> i32 {
        match self {
            Self::General => 0,
            Self::Admin => 1,
        }
    }
}

/// Soft-delete state (`0` active, `1` deleted in storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Deleted,
}

impl EmployeeStatus {
    /// Any flag other than `0` is treated as deleted.
    pub fn from_flag(flag: i32) -> Self {
        if flag == 0 {
            Self::Active
        } else {
            Self::Deleted
        }
    }

    pub fn flag(self) -> i32 {
        match self {
            Self::Active => 0,
            Self::Deleted => 1,
        }
    }
}

/// Which rows a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeFilter {
    #[default]
    Active,
    All,
}

impl EmployeeFilter {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("all") => Self::All,
            _ => Self::Active,
        }
    }
}

/// Snapshot of the logged-in employee kept in session scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEmployee {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub role: Role,
}

impl LoginEmployee {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&Employee> for LoginEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            code: employee.code.clone(),
            name: employee.name.clone(),
            role: employee.role,
        }
    }
}

/// Server-side state of one browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Anti-forgery token embedded in every form rendered for this session.
    pub csrf_token: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Session lifetime without activity, in seconds.
pub const SESSION_TTL_SECS: u64 = 1800;

/// Form input shared by registration and edit.
#[derive(Debug, Clone, Default)]
pub struct EmployeeForm {
    pub code: String,
    pub name: String,
    pub password: String,
    pub admin_flag: Option<i32>,
}

/// Validate an employee form. `code_taken` reports whether another employee
/// already holds `form.code`; `password_required` is true on registration.
pub fn validate_employee(
    form: &EmployeeForm,
    code_taken: bool,
    password_required: bool,
) -> Vec<String> {
    let mut errors = Vec::new();

    if form.code.trim().is_empty() {
        errors.push("Employee code is required.".to_owned());
    } else if code_taken {
        errors.push("An employee with that code already exists.".to_owned());
    }

    if form.name.trim().is_empty() {
        errors.push("Name is required.".to_owned());
    }

    if form.password.is_empty() {
        if password_required {
            errors.push("Password is required.".to_owned());
        }
    } else if form.password.chars().count() > PASSWORD_MAX_LEN {
        errors.push(format!(
            "Password must be at most {PASSWORD_MAX_LEN} characters."
        ));
    }

    if form.admin_flag.and_then(Role::from_flag).is_none() {
        errors.push("Choose an administrator setting.".to_owned());
    }

    errors
}
