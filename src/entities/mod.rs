pub mod employee;
pub mod leave_request;
pub mod salary;

pub use employee::{CreateEmployee, Employee, EmployeeSummary, Gender, UpdateEmployee};
pub use leave_request::{
    CreateLeaveRequest, LeaveDecision, LeaveRequest, LeaveStatus, LeaveType,
};
pub use salary::{Salary, SalaryListParameters};
