//! Tests for the leave request workflow: creation, the two query surfaces,
//! and manager decisions.

use std::collections::HashMap;

use miette::Result;
use time::macros::date;
use warp::Filter;
use warp::http::StatusCode;

use hrportal_rs::{
    Client, CreateLeaveRequest, Error, LeaveDecision, LeaveStatus, LeaveType,
};


fn pending_request_json(leave_id: i64, emp_no: u32) -> serde_json::Value {
    serde_json::json!({
        "leave_id": leave_id,
        "emp_no": emp_no,
        "leave_type_id": 2,
        "start_date": "2024-03-01",
        "end_date": "2024-03-05",
        "requested_at": "2024-02-20T09:15:00",
        "decided_at": null,
        "status": "PENDING",
        "manager_emp_no": null,
        "employee_comment": "flu",
        "manager_comment": null,
    })
}

#[tokio::test]
async fn create_enters_pending_state() -> Result<()> {
    test_utils::do_setup();

    let create = warp::path!("leave-requests")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: serde_json::Value| {
            if body["emp_no"] == 110022
                && body["leave_type_id"] == 2
                && body["start_date"] == "2024-03-01"
                && body["end_date"] == "2024-03-05"
                && body["employee_comment"] == "flu"
            {
                warp::reply::with_status(
                    warp::reply::json(&pending_request_json(41, 110022)),
                    StatusCode::CREATED,
                )
            } else {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({"detail": "unexpected payload"})),
                    StatusCode::UNPROCESSABLE_ENTITY,
                )
            }
        });

    let (addr, server) = warp::serve(create).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = Client::new(format!("http://{addr}").parse().unwrap());

    let created = client
        .leave_requests()
        .create(&CreateLeaveRequest {
            emp_no: 110022,
            leave_type_id: LeaveType::Sick,
            start_date: date!(2024 - 03 - 01),
            end_date: date!(2024 - 03 - 05),
            employee_comment: Some("flu".to_string()),
        })
        .await
        .map_err(|e| miette::miette!("create failed: {e:?}"))?;

    assert_eq!(created.leave_id, 41);
    assert_eq!(created.status, LeaveStatus::Pending);
    assert!(created.is_pending());
    assert_eq!(created.leave_type_id, LeaveType::Sick);
    assert!(created.decided_at.is_none());
    assert!(created.manager_emp_no.is_none());
    assert_eq!(created.employee_comment.as_deref(), Some("flu"));
    Ok(())
}

#[tokio::test]
async fn list_mine_filters_by_employee_number() -> Result<()> {
    test_utils::do_setup();

    let list = warp::path!("leave-requests")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .map(|q: HashMap<String, String>| {
            if q.get("emp_no").map(String::as_str) == Some("110022") && !q.contains_key("status") {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!([
                        pending_request_json(41, 110022),
                        {
                            "leave_id": 17,
                            "emp_no": 110022,
                            "leave_type_id": 0,
                            "start_date": "2023-12-20",
                            "end_date": "2023-12-24",
                            "requested_at": "2023-12-01T08:00:00",
                            "decided_at": "2023-12-02T10:30:00",
                            "status": "APPROVED",
                            "manager_emp_no": 110010,
                            "employee_comment": null,
                            "manager_comment": "enjoy",
                        },
                    ])),
                    StatusCode::OK,
                )
            } else {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({"detail": "unexpected query"})),
                    StatusCode::BAD_REQUEST,
                )
            }
        });

    let (addr, server) = warp::serve(list).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = Client::new(format!("http://{addr}").parse().unwrap());

    let mine = client
        .leave_requests()
        .list_mine(110022)
        .await
        .map_err(|e| miette::miette!("list failed: {e:?}"))?;

    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].status, LeaveStatus::Pending);
    assert_eq!(mine[1].status, LeaveStatus::Approved);
    assert_eq!(mine[1].leave_type_id, LeaveType::Paid);
    assert!(mine[1].decided_at.is_some());
    Ok(())
}

#[tokio::test]
async fn list_pending_for_manager_sends_pending_filter() -> Result<()> {
    test_utils::do_setup();

    let list = warp::path!("leave-requests")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .map(|q: HashMap<String, String>| {
            if q.get("manager_emp_no").map(String::as_str) == Some("110010")
                && q.get("status").map(String::as_str) == Some("PENDING")
            {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!([pending_request_json(41, 110022)])),
                    StatusCode::OK,
                )
            } else {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({"detail": "unexpected query"})),
                    StatusCode::BAD_REQUEST,
                )
            }
        });

    let (addr, server) = warp::serve(list).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = Client::new(format!("http://{addr}").parse().unwrap());

    let pending = client
        .leave_requests()
        .list_pending_for_manager(110010)
        .await
        .map_err(|e| miette::miette!("list failed: {e:?}"))?;

    assert_eq!(pending.len(), 1);
    assert!(pending.iter().all(hrportal_rs::LeaveRequest::is_pending));
    Ok(())
}

#[tokio::test]
async fn decide_approves_pending_request() -> Result<()> {
    test_utils::do_setup();

    let decide = warp::path!("leave-requests" / i64)
        .and(warp::put())
        .and(warp::body::json())
        .map(|leave_id: i64, body: serde_json::Value| {
            if leave_id == 7
                && body["status"] == "APPROVED"
                && body["manager_emp_no"] == 110010
                && body["manager_comment"] == "approved, enjoy"
            {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({
                        "leave_id": 7,
                        "emp_no": 110022,
                        "leave_type_id": 2,
                        "start_date": "2024-03-01",
                        "end_date": "2024-03-05",
                        "requested_at": "2024-02-20T09:15:00",
                        "decided_at": "2024-02-21T14:00:00",
                        "status": "APPROVED",
                        "manager_emp_no": 110010,
                        "employee_comment": "flu",
                        "manager_comment": "approved, enjoy",
                    })),
                    StatusCode::OK,
                )
            } else {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({"detail": "unexpected payload"})),
                    StatusCode::UNPROCESSABLE_ENTITY,
                )
            }
        });

    let (addr, server) = warp::serve(decide).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = Client::new(format!("http://{addr}").parse().unwrap());

    let updated = client
        .leave_requests()
        .decide(
            7,
            LeaveDecision::Approved,
            110010,
            Some("approved, enjoy".to_string()),
        )
        .await
        .map_err(|e| miette::miette!("decide failed: {e:?}"))?;

    assert_eq!(updated.status, LeaveStatus::Approved);
    assert_eq!(updated.manager_emp_no, Some(110010));
    assert!(updated.decided_at.is_some());
    assert_eq!(updated.manager_comment.as_deref(), Some("approved, enjoy"));
    assert!(updated.status.is_terminal());
    Ok(())
}

#[tokio::test]
async fn decide_by_non_manager_surfaces_authorization_error() {
    test_utils::do_setup();

    let decide = warp::path!("leave-requests" / i64)
        .and(warp::put())
        .and(warp::body::json())
        .map(|_leave_id: i64, _body: serde_json::Value| {
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "detail": "Not the requester's manager",
                })),
                StatusCode::FORBIDDEN,
            )
        });

    let (addr, server) = warp::serve(decide).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = Client::new(format!("http://{addr}").parse().unwrap());

    let err = client
        .leave_requests()
        .decide(7, LeaveDecision::Rejected, 110099, None)
        .await
        .expect_err("server must reject the decision");

    match &err {
        Error::Authorization { detail, status_code, .. } => {
            assert_eq!(*status_code, reqwest::StatusCode::FORBIDDEN);
            assert_eq!(detail.as_deref(), Some("Not the requester's manager"));
        }
        other => panic!("expected Authorization error, got {other:?}"),
    }
    assert_eq!(err.detail(), Some("Not the requester's manager"));
}

/// The decision type carries only the two decided states, so the workflow
/// offers no operation that could re-enter `PENDING` or reach `CANCELLED`.
#[test]
fn decision_type_covers_only_decided_states() {
    for decision in [LeaveDecision::Approved, LeaveDecision::Rejected] {
        let wire = serde_json::to_value(decision).unwrap();
        assert!(
            wire == "APPROVED" || wire == "REJECTED",
            "unexpected wire form {wire}"
        );
    }
}

#[test]
fn terminal_states_permit_no_further_transition() {
    assert!(!LeaveStatus::Pending.is_terminal());
    assert!(LeaveStatus::Approved.is_terminal());
    assert!(LeaveStatus::Rejected.is_terminal());
    assert!(LeaveStatus::Cancelled.is_terminal());
}

#[test]
fn leave_type_serializes_as_integer_id() {
    assert_eq!(serde_json::to_string(&LeaveType::Paid).unwrap(), "0");
    assert_eq!(serde_json::to_string(&LeaveType::Unpaid).unwrap(), "1");
    assert_eq!(serde_json::to_string(&LeaveType::Sick).unwrap(), "2");
    assert_eq!(serde_json::to_string(&LeaveType::Other).unwrap(), "3");

    let parsed: LeaveType = serde_json::from_str("2").unwrap();
    assert_eq!(parsed, LeaveType::Sick);

    let err = serde_json::from_str::<LeaveType>("7").expect_err("unknown id");
    assert!(err.to_string().contains("unknown leave type id"));
}
