use core::fmt;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing_error::SpanTrace;
use url::Url;

use crate::endpoints::PortalEndpoint;
use crate::entities::{
    employee::{self, CreateEmployee, Employee, EmployeeSummary, UpdateEmployee},
    leave_request::{CreateLeaveRequest, LeaveDecision, LeaveRequest},
    salary::{Salary, SalaryListParameters},
};
use crate::error::{ApiErrorBody, Error, Result};

/// Environment variable naming the portal server base URL.
pub const BASE_URL_ENV: &str = "HRPORTAL_BASE_URL";

/// The client used for interacting with the HR portal API.
///
/// Holds the server base URL and the bearer credential slot. When a
/// credential is present every request carries `Authorization: Bearer ...`;
/// when absent the header is omitted entirely and the server decides
/// per-endpoint whether that is acceptable. The credential slot is managed by
/// [`SessionManager`](crate::SessionManager).
///
/// Every operation is a single request: no retries, no client-side timeouts
/// beyond the transport defaults, no cancellation.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    credential: Option<String>,
}

impl Client {
    /// Creates a client for the given portal base URL.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Self {
            base_url,
            credential: None,
        }
    }

    /// Creates a client from the `HRPORTAL_BASE_URL` environment variable.
    ///
    /// # Panics
    /// Panics if `HRPORTAL_BASE_URL` is not set.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(BASE_URL_ENV).expect("HRPORTAL_BASE_URL not set");
        let base_url = Url::parse(&raw).map_err(|_| Error::InvalidEndpoint)?;
        Ok(Self::new(base_url))
    }

    /// The portal base URL this client targets.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The raw credential currently attached to requests, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Installs or clears the bearer credential.
    pub fn set_credential(&mut self, credential: Option<String>) {
        trace!(present = credential.is_some(), "updating client credential");
        self.credential = credential;
    }

    #[instrument(skip(self))]
    fn build_http_client(&self) -> reqwest::Client {
        let mut headers = header::HeaderMap::new();
        if let Some(credential) = &self.credential {
            headers.append(
                "Authorization",
                header::HeaderValue::from_str(&format!("Bearer {credential}")).unwrap(),
            );
        }
        reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap()
    }

    /// Build a request object with authentication headers.
    pub(crate) fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.build_http_client()
            .request(method, url)
            .header(header::ACCEPT, "application/json")
    }

    pub(crate) fn endpoint_url(&self, endpoint: &PortalEndpoint) -> Result<Url> {
        endpoint.to_url(&self.base_url)
    }

    /// Perform a `GET` request against the API.
    #[instrument(skip(self, query))]
    pub async fn get<R: DeserializeOwned, T: Serialize + Sized + fmt::Debug>(
        &self,
        endpoint: PortalEndpoint,
        query: &T,
    ) -> Result<R> {
        trace!(?query, %endpoint, "making GET request");
        let url = self.endpoint_url(&endpoint)?;
        let response = self
            .build_request(Method::GET, url)
            .query(query)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Perform a `POST` request against the API.
    #[instrument(skip(self, data))]
    pub async fn post<R: DeserializeOwned, T: Serialize + Sized + fmt::Debug>(
        &self,
        endpoint: PortalEndpoint,
        data: &T,
    ) -> Result<R> {
        trace!(?data, %endpoint, "making POST request");
        let url = self.endpoint_url(&endpoint)?;
        let response = self
            .build_request(Method::POST, url)
            .json(data)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Perform a `PUT` request against the API.
    #[instrument(skip(self, data))]
    pub async fn put<R: DeserializeOwned, T: Serialize + Sized + fmt::Debug>(
        &self,
        endpoint: PortalEndpoint,
        data: &T,
    ) -> Result<R> {
        trace!(?data, %endpoint, "making PUT request");
        let url = self.endpoint_url(&endpoint)?;
        let response = self
            .build_request(Method::PUT, url)
            .json(data)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(response))]
    async fn handle_response<T: DeserializeOwned + Sized>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
            .to_string();

        tracing::debug!(
            "Response from {}: status={}, entity_type={}",
            url,
            status,
            entity_type
        );

        let text = response.text().await?;
        tracing::trace!("Response text:\n{}", text);

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                tracing::error!("Failed to deserialize response: {}", e);
                Error::Deserialization(e, Some(text))
            });
        }

        let detail = ApiErrorBody::detail_from_body(&text);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Authorization {
                status_code: status,
                detail,
                span_trace: SpanTrace::capture(),
            }),
            StatusCode::NOT_FOUND => Err(Error::NotFound {
                entity: entity_type,
                url,
                response_body: Some(text),
                span_trace: SpanTrace::capture(),
            }),
            _ => {
                tracing::error!("Unexpected status code: {}", status);
                Err(Error::Api {
                    status_code: status,
                    detail,
                    url,
                    span_trace: SpanTrace::capture(),
                })
            }
        }
    }

    /// Access the auth API
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    /// Access the employees API
    #[must_use]
    pub fn employees(&self) -> EmployeesApi<'_> {
        EmployeesApi { client: self }
    }

    /// Access the salaries API
    #[must_use]
    pub fn salaries(&self) -> SalariesApi<'_> {
        SalariesApi { client: self }
    }

    /// Access the leave requests API
    #[must_use]
    pub fn leave_requests(&self) -> LeaveRequestsApi<'_> {
        LeaveRequestsApi { client: self }
    }
}

/// Successful login exchange response.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Response to a password change.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChangePasswordMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ChangePasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// API handler for auth endpoints
#[derive(Debug)]
pub struct AuthApi<'a> {
    client: &'a Client,
}

impl AuthApi<'_> {
    /// Performs the raw login exchange, returning the issued credential.
    ///
    /// Credentials are sent form-encoded; this is the server's login
    /// contract, not a choice. Most callers want
    /// [`SessionManager::login`](crate::SessionManager::login), which layers
    /// validation, claim decoding, and persistence on top of this call.
    ///
    /// A non-success status surfaces as [`Error::Authentication`] carrying
    /// the server's detail message when present, never its internals.
    #[instrument(skip(self, password))]
    pub async fn token(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = self.client.endpoint_url(&PortalEndpoint::Login)?;
        let response = self
            .client
            .build_request(Method::POST, url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            return serde_json::from_str(&text).map_err(|e| Error::Deserialization(e, Some(text)));
        }

        let text = response.text().await.unwrap_or_default();
        debug!(%status, "login rejected");
        Err(Error::Authentication {
            detail: ApiErrorBody::detail_from_body(&text),
            span_trace: SpanTrace::capture(),
        })
    }

    /// Changes the authenticated user's password.
    ///
    /// Input rules are checked locally before any request: the current
    /// password must not be blank, and the new password must be 6-12
    /// characters, not blank, different from the current one, and contain at
    /// least one letter and one digit.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<ChangePasswordMessage> {
        validate_new_password(current_password, new_password)?;
        self.client
            .post(
                PortalEndpoint::ChangePassword,
                &ChangePasswordBody {
                    current_password,
                    new_password,
                },
            )
            .await
    }
}

fn validate_new_password(current_password: &str, new_password: &str) -> Result<()> {
    if current_password.trim().is_empty() {
        return Err(Error::Validation(
            "current password must not be empty".to_string(),
        ));
    }
    if new_password.len() < 6 || new_password.len() > 12 {
        return Err(Error::Validation(
            "new password must be 6-12 characters".to_string(),
        ));
    }
    if new_password.trim().is_empty() {
        return Err(Error::Validation(
            "new password must not be only spaces".to_string(),
        ));
    }
    if new_password == current_password {
        return Err(Error::Validation(
            "new password must differ from the current password".to_string(),
        ));
    }
    let has_letter = new_password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = new_password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(Error::Validation(
            "new password must contain at least one letter and one number".to_string(),
        ));
    }
    Ok(())
}

/// API handler for Employees endpoints
#[derive(Debug)]
pub struct EmployeesApi<'a> {
    client: &'a Client,
}

impl EmployeesApi<'_> {
    /// Retrieve a single employee by number
    #[instrument(skip(self))]
    pub async fn get(&self, emp_no: u32) -> Result<Employee> {
        Employee::get(self.client, emp_no).await
    }

    /// Retrieve a paginated list of employees
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: employee::ListParameters) -> Result<Vec<Employee>> {
        Employee::list(self.client, parameters).await
    }

    /// List employees with default pagination
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Employee>> {
        self.list(employee::ListParameters::default()).await
    }

    /// Search employees by name
    #[instrument(skip(self))]
    pub async fn search_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        page: u32,
    ) -> Result<Vec<EmployeeSummary>> {
        Employee::search_by_name(self.client, first_name, last_name, page).await
    }

    /// Create a new employee (HR-admin capability)
    #[instrument(skip(self, employee))]
    pub async fn create(&self, employee: &CreateEmployee) -> Result<Employee> {
        Employee::create(self.client, employee).await
    }

    /// Update an existing employee (HR-admin capability)
    #[instrument(skip(self, update))]
    pub async fn update(&self, emp_no: u32, update: &UpdateEmployee) -> Result<Employee> {
        Employee::update(self.client, emp_no, update).await
    }
}

/// API handler for Salaries endpoints
#[derive(Debug)]
pub struct SalariesApi<'a> {
    client: &'a Client,
}

impl SalariesApi<'_> {
    /// Retrieve an employee's salary history, optionally bounded to a range
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        emp_no: u32,
        parameters: SalaryListParameters,
    ) -> Result<Vec<Salary>> {
        Salary::list(self.client, emp_no, parameters).await
    }
}

/// API handler for Leave Requests endpoints
#[derive(Debug)]
pub struct LeaveRequestsApi<'a> {
    client: &'a Client,
}

impl LeaveRequestsApi<'_> {
    /// Create a new leave request in `PENDING` state
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: &CreateLeaveRequest) -> Result<LeaveRequest> {
        LeaveRequest::create(self.client, request).await
    }

    /// List the given employee's own leave requests
    #[instrument(skip(self))]
    pub async fn list_mine(&self, emp_no: u32) -> Result<Vec<LeaveRequest>> {
        LeaveRequest::list_mine(self.client, emp_no).await
    }

    /// List pending leave requests from the manager's direct reports
    #[instrument(skip(self))]
    pub async fn list_pending_for_manager(
        &self,
        manager_emp_no: u32,
    ) -> Result<Vec<LeaveRequest>> {
        LeaveRequest::list_pending_for_manager(self.client, manager_emp_no).await
    }

    /// Record a manager decision on a pending leave request
    #[instrument(skip(self))]
    pub async fn decide(
        &self,
        leave_id: i64,
        decision: LeaveDecision,
        manager_emp_no: u32,
        manager_comment: Option<String>,
    ) -> Result<LeaveRequest> {
        LeaveRequest::decide(self.client, leave_id, decision, manager_emp_no, manager_comment)
            .await
    }
}
