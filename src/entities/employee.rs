//! Employee records and the HR-admin management surface.
//!
//! Employees are read-only projections for most callers; only HR admins
//! create or update records, and the server enforces that capability on every
//! call.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::client::Client;
use crate::endpoints::PortalEndpoint;
use crate::error::Result;
use crate::utils::date_format::{iso_date_format, iso_date_format_option};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// A full employee record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub emp_no: u32,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    #[serde(with = "iso_date_format")]
    pub birth_date: Date,
    #[serde(with = "iso_date_format")]
    pub hire_date: Date,
}

/// Summary row returned by the name search.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub emp_no: u32,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

/// Payload for creating a new employee (HR-admin capability).
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CreateEmployee {
    #[serde(with = "iso_date_format")]
    pub birth_date: Date,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    #[serde(with = "iso_date_format")]
    pub hire_date: Date,
    pub dept_no: String,
    pub title: String,
    pub starting_salary: i64,
}

/// Partial update for an employee record (HR-admin capability).
///
/// Absent fields are omitted from the request body and left unchanged.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct UpdateEmployee {
    #[serde(
        default,
        with = "iso_date_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(
        default,
        with = "iso_date_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub hire_date: Option<Date>,
}

/// Parameters for the paginated employee listing.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ListParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl Default for ListParameters {
    fn default() -> Self {
        Self {
            limit: Some(50),
            offset: Some(0),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    first_name: &'a str,
    last_name: &'a str,
    page: u32,
}

impl Employee {
    /// Fetches a single employee by number.
    pub async fn get(client: &Client, emp_no: u32) -> Result<Employee> {
        debug!(emp_no, "fetching employee");
        client.get(PortalEndpoint::Employee(emp_no), &()).await
    }

    /// Lists employees with pagination.
    pub async fn list(client: &Client, parameters: ListParameters) -> Result<Vec<Employee>> {
        debug!(?parameters, "listing employees");
        let employees: Vec<Employee> =
            client.get(PortalEndpoint::Employees, &parameters).await?;
        debug!("response contains {} employees", employees.len());
        Ok(employees)
    }

    /// Searches employees by first and/or last name.
    pub async fn search_by_name(
        client: &Client,
        first_name: &str,
        last_name: &str,
        page: u32,
    ) -> Result<Vec<EmployeeSummary>> {
        debug!(first_name, last_name, page, "searching employees by name");
        client
            .get(
                PortalEndpoint::EmployeeSearch,
                &SearchQuery {
                    first_name,
                    last_name,
                    page,
                },
            )
            .await
    }

    /// Creates a new employee record. Requires the HR-admin capability.
    pub async fn create(client: &Client, employee: &CreateEmployee) -> Result<Employee> {
        info!(
            first_name = %employee.first_name,
            last_name = %employee.last_name,
            "creating employee"
        );
        let created: Employee = client.post(PortalEndpoint::Employees, employee).await?;
        info!(emp_no = created.emp_no, "employee created");
        Ok(created)
    }

    /// Applies a partial update to an employee record. Requires the HR-admin
    /// capability.
    pub async fn update(
        client: &Client,
        emp_no: u32,
        update: &UpdateEmployee,
    ) -> Result<Employee> {
        info!(emp_no, "updating employee");
        client.put(PortalEndpoint::Employee(emp_no), update).await
    }
}
