//! Leave request workflow.
//!
//! A leave request moves from `PENDING` into exactly one of the terminal
//! states `APPROVED` or `REJECTED` via a manager decision. `CANCELLED` exists
//! on the wire but no client operation produces it; whether cancellation is
//! employee-initiated or administrative is still an open product question, so
//! the state is exposed and the transition deliberately absent.
//!
//! # Example
//!
//! ```no_run
//! use hrportal_rs::{Client, CreateLeaveRequest, LeaveDecision, LeaveType};
//! use time::macros::date;
//!
//! # async fn example(client: &Client) -> hrportal_rs::Result<()> {
//! let created = client
//!     .leave_requests()
//!     .create(&CreateLeaveRequest {
//!         emp_no: 110022,
//!         leave_type_id: LeaveType::Sick,
//!         start_date: date!(2024 - 03 - 01),
//!         end_date: date!(2024 - 03 - 05),
//!         employee_comment: Some("flu".to_string()),
//!     })
//!     .await?;
//! assert!(created.is_pending());
//!
//! // Later, as the requester's manager:
//! client
//!     .leave_requests()
//!     .decide(created.leave_id, LeaveDecision::Approved, 110010, None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use time::{Date, OffsetDateTime};

use crate::client::Client;
use crate::endpoints::PortalEndpoint;
use crate::error::Result;
use crate::utils::date_format::{iso_date_format, iso_datetime_format, iso_datetime_format_option};

/// Lifecycle state of a leave request.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Awaiting a manager decision. The only state decisions apply to.
    Pending,
    Approved,
    Rejected,
    /// Produced only by a server-side path; no client operation reaches it.
    Cancelled,
}

impl LeaveStatus {
    /// Whether no further transition is permitted from this state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Category of leave, serialized as the server's integer id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveType {
    Paid,
    Unpaid,
    Sick,
    Other,
}

impl From<LeaveType> for u8 {
    fn from(leave_type: LeaveType) -> Self {
        match leave_type {
            LeaveType::Paid => 0,
            LeaveType::Unpaid => 1,
            LeaveType::Sick => 2,
            LeaveType::Other => 3,
        }
    }
}

impl TryFrom<u8> for LeaveType {
    type Error = u8;

    fn try_from(id: u8) -> std::result::Result<Self, u8> {
        match id {
            0 => Ok(Self::Paid),
            1 => Ok(Self::Unpaid),
            2 => Ok(Self::Sick),
            3 => Ok(Self::Other),
            other => Err(other),
        }
    }
}

impl Serialize for LeaveType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for LeaveType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = u8::deserialize(deserializer)?;
        Self::try_from(id).map_err(|id| de::Error::custom(format!("unknown leave type id {id}")))
    }
}

/// A manager's decision on a pending leave request.
///
/// Only the two decided states are representable here; `PENDING` and
/// `CANCELLED` cannot be submitted through the decision path.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

/// One employee's time-off request.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LeaveRequest {
    /// Server-assigned identity; never changes.
    pub leave_id: i64,
    /// The requester. Immutable.
    pub emp_no: u32,
    pub leave_type_id: LeaveType,
    #[serde(with = "iso_date_format")]
    pub start_date: Date,
    #[serde(with = "iso_date_format")]
    pub end_date: Date,
    #[serde(with = "iso_datetime_format")]
    pub requested_at: OffsetDateTime,
    /// Set only when a decision is recorded.
    #[serde(default, with = "iso_datetime_format_option")]
    pub decided_at: Option<OffsetDateTime>,
    pub status: LeaveStatus,
    /// The deciding manager; set only when a decision is recorded.
    pub manager_emp_no: Option<u32>,
    pub employee_comment: Option<String>,
    pub manager_comment: Option<String>,
}

impl LeaveRequest {
    /// Whether a manager decision is still applicable.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }
}

/// Payload for creating a new leave request.
///
/// The server assigns `leave_id` and `requested_at` and enters the request in
/// `PENDING`. Date ordering (`end_date >= start_date`) is not checked here;
/// the server owns that rule.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CreateLeaveRequest {
    pub emp_no: u32,
    pub leave_type_id: LeaveType,
    #[serde(with = "iso_date_format")]
    pub start_date: Date,
    #[serde(with = "iso_date_format")]
    pub end_date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_comment: Option<String>,
}

#[derive(Debug, Serialize)]
struct MineQuery {
    emp_no: u32,
}

#[derive(Debug, Serialize)]
struct PendingForManagerQuery {
    manager_emp_no: u32,
    status: LeaveStatus,
}

#[derive(Debug, Serialize)]
struct DecisionBody {
    status: LeaveDecision,
    manager_emp_no: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    manager_comment: Option<String>,
}

impl LeaveRequest {
    /// Lists all leave requests belonging to `emp_no`.
    ///
    /// Ordering is server-determined and treated as opaque.
    pub async fn list_mine(client: &Client, emp_no: u32) -> Result<Vec<LeaveRequest>> {
        debug!(emp_no, "listing own leave requests");
        let requests: Vec<LeaveRequest> = client
            .get(PortalEndpoint::LeaveRequests, &MineQuery { emp_no })
            .await?;
        debug!("response contains {} leave requests", requests.len());
        Ok(requests)
    }

    /// Lists pending leave requests from employees reporting to
    /// `manager_emp_no`.
    ///
    /// Membership in "reports to" is determined entirely server-side; the
    /// client only supplies the manager's employee number and the `PENDING`
    /// filter.
    pub async fn list_pending_for_manager(
        client: &Client,
        manager_emp_no: u32,
    ) -> Result<Vec<LeaveRequest>> {
        debug!(manager_emp_no, "listing pending leave requests for manager");
        let requests: Vec<LeaveRequest> = client
            .get(
                PortalEndpoint::LeaveRequests,
                &PendingForManagerQuery {
                    manager_emp_no,
                    status: LeaveStatus::Pending,
                },
            )
            .await?;
        debug!("response contains {} pending leave requests", requests.len());
        Ok(requests)
    }

    /// Creates a new leave request in `PENDING` state.
    ///
    /// The caller is responsible for refreshing any cached list afterwards.
    pub async fn create(client: &Client, request: &CreateLeaveRequest) -> Result<LeaveRequest> {
        info!(emp_no = request.emp_no, "creating leave request");
        let created: LeaveRequest = client
            .post(PortalEndpoint::LeaveRequests, request)
            .await?;
        info!(leave_id = created.leave_id, "leave request created");
        Ok(created)
    }

    /// Records a manager decision on a pending leave request.
    ///
    /// If the acting principal is not the requester's manager, the server
    /// rejects the call and it surfaces as
    /// [`Error::Authorization`](crate::Error::Authorization); the request is
    /// left unchanged. The client never attempts to enforce that rule itself.
    pub async fn decide(
        client: &Client,
        leave_id: i64,
        decision: LeaveDecision,
        manager_emp_no: u32,
        manager_comment: Option<String>,
    ) -> Result<LeaveRequest> {
        info!(leave_id, ?decision, manager_emp_no, "recording leave decision");
        let updated: LeaveRequest = client
            .put(
                PortalEndpoint::LeaveRequest(leave_id),
                &DecisionBody {
                    status: decision,
                    manager_emp_no,
                    manager_comment,
                },
            )
            .await?;
        info!(leave_id = updated.leave_id, status = ?updated.status, "leave decision recorded");
        Ok(updated)
    }
}
