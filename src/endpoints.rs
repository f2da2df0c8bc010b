use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// A typed representation of portal API endpoints.
///
/// This enum represents all the endpoints exposed by the HR portal server,
/// providing a type-safe way to construct request URLs against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEndpoint {
    // Auth endpoints
    Login,
    ChangePassword,

    // Employee endpoints
    Employees,
    Employee(u32),
    EmployeeSearch,

    // Salary endpoints
    Salaries(u32),

    // Leave request endpoints
    LeaveRequests,
    LeaveRequest(i64),
}

impl PortalEndpoint {
    /// The path of this endpoint relative to the server base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "auth/login".to_string(),
            Self::ChangePassword => "auth/change-password".to_string(),
            Self::Employees => "employees".to_string(),
            Self::Employee(emp_no) => format!("employees/{emp_no}"),
            Self::EmployeeSearch => "employees/search-by-name".to_string(),
            Self::Salaries(emp_no) => format!("salaries/{emp_no}"),
            Self::LeaveRequests => "leave-requests".to_string(),
            Self::LeaveRequest(leave_id) => format!("leave-requests/{leave_id}"),
        }
    }

    /// Resolves the endpoint against the given base URL.
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        base.join(&self.path()).map_err(|_| Error::InvalidEndpoint)
    }
}

impl fmt::Display for PortalEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}
