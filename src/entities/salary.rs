//! Salary history lookup.
//!
//! Salaries are read-only projections; the client never mutates them.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::client::Client;
use crate::endpoints::PortalEndpoint;
use crate::error::Result;
use crate::utils::date_format::{iso_date_format, iso_date_format_option};

/// One salary period for an employee.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Salary {
    pub salary: i64,
    #[serde(with = "iso_date_format")]
    pub start_date: Date,
    #[serde(with = "iso_date_format")]
    pub end_date: Date,
}

/// Optional date range filter for the salary listing.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct SalaryListParameters {
    #[serde(
        default,
        with = "iso_date_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Date>,
    #[serde(
        default,
        with = "iso_date_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Date>,
}

impl Salary {
    /// Lists salary periods for an employee, optionally bounded to a range.
    pub async fn list(
        client: &Client,
        emp_no: u32,
        parameters: SalaryListParameters,
    ) -> Result<Vec<Salary>> {
        debug!(emp_no, ?parameters, "fetching salary history");
        let salaries: Vec<Salary> = client
            .get(PortalEndpoint::Salaries(emp_no), &parameters)
            .await?;
        debug!("response contains {} salary periods", salaries.len());
        Ok(salaries)
    }
}
