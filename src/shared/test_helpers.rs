use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Session;
use crate::features::lifecycle::{IssueType, Priority, ReportStatus, StatusHistoryEntry};
use crate::modules::civic_api::{
    CivicApi, CreateReportPayload, Department, IssueReport, LoginPayload, ReportQuery,
    SignupPayload, StatusUpdatePayload, TokenResponse, UpstreamUser, UserRole, Vote,
};

// =============================================================================
// USERS & REPORTS
// =============================================================================

pub fn user_with_role(id: i64, role: UserRole) -> UpstreamUser {
    UpstreamUser {
        id,
        name: Name().fake(),
        email: SafeEmail().fake(),
        role,
        ward: Some("Ward 7".to_string()),
        created_at: Some(Utc::now()),
    }
}

pub fn citizen(id: i64) -> UpstreamUser {
    user_with_role(id, UserRole::Citizen)
}

pub fn department_staff(id: i64) -> UpstreamUser {
    user_with_role(id, UserRole::Department)
}

pub fn admin(id: i64) -> UpstreamUser {
    user_with_role(id, UserRole::Admin)
}

pub fn department(id: i64, name: &str, issue_types: &str) -> Department {
    Department {
        id,
        name: name.to_string(),
        contact_email: Some(format!("dept{}@letsfix.gov", id)),
        ward: None,
        supported_issue_types: Some(issue_types.to_string()),
    }
}

/// Open pothole report near Hyderabad, created an hour ago with a deadline 71 hours out
pub fn report(id: i64) -> IssueReport {
    let created_at = Utc::now() - Duration::hours(1);
    IssueReport {
        id,
        title: Sentence(3..6).fake(),
        description: Sentence(8..14).fake(),
        image_url: None,
        issue_type: Some(IssueType::Pothole),
        latitude: 17.5449,
        longitude: 78.3995,
        address: None,
        status: Some(ReportStatus::Assigned),
        priority: Some(Priority::Low),
        priority_score: 1.0,
        upvote_count: 0,
        is_duplicate: false,
        is_hotspot: false,
        sla_deadline: Some(created_at + Duration::hours(72)),
        created_at: Some(created_at),
        user_id: Some(1),
        department_id: Some(1),
        department: None,
        status_history: vec![history(ReportStatus::Assigned, "Auto-assigned")],
    }
}

pub fn history(status: ReportStatus, remark: &str) -> StatusHistoryEntry {
    StatusHistoryEntry {
        id: None,
        old_status: None,
        new_status: Some(status),
        remark: Some(remark.to_string()),
        timestamp: Some(Utc::now()),
    }
}

// =============================================================================
// IN-MEMORY REPORT SERVICE
// =============================================================================

#[derive(Default)]
struct FakeState {
    users: HashMap<String, UpstreamUser>,
    accounts: HashMap<String, (String, String)>,
    reports: Vec<IssueReport>,
    departments: Vec<Department>,
    votes: HashSet<(i64, i64)>,
    calls: HashMap<&'static str, usize>,
}

/// `CivicApi` backed by memory, mirroring the report service's answers
#[derive(Default)]
pub struct FakeCivicApi {
    state: Mutex<FakeState>,
    unavailable: bool,
}

impl FakeCivicApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the service were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_user(self, token: &str, user: UpstreamUser) -> Self {
        self.state
            .lock()
            .unwrap()
            .users
            .insert(token.to_string(), user);
        self
    }

    pub fn with_account(self, email: &str, password: &str, token: &str, user: UpstreamUser) -> Self {
        self.state.lock().unwrap().accounts.insert(
            email.to_string(),
            (password.to_string(), token.to_string()),
        );
        self.with_user(token, user)
    }

    pub fn with_report(self, report: IssueReport) -> Self {
        self.state.lock().unwrap().reports.push(report);
        self
    }

    pub fn with_department(self, department: Department) -> Self {
        self.state.lock().unwrap().departments.push(department);
        self
    }

    pub fn with_vote(self, user_id: i64, report_id: i64) -> Self {
        self.state
            .lock()
            .unwrap()
            .votes
            .insert((user_id, report_id));
        self
    }

    /// Number of times an operation was called
    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn stored_report(&self, id: i64) -> Option<IssueReport> {
        self.state
            .lock()
            .unwrap()
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    fn enter(&self, operation: &'static str) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_insert(0) += 1;
        if self.unavailable {
            return Err(AppError::ExternalServiceError(format!(
                "Failed to {}: connection refused",
                operation
            )));
        }
        Ok(state)
    }
}

fn user_for(state: &FakeState, token: &str) -> Result<UpstreamUser> {
    state
        .users
        .get(token)
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))
}

fn report_mut(state: &mut FakeState, id: i64) -> Result<&mut IssueReport> {
    state
        .reports
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
}

#[async_trait]
impl CivicApi for FakeCivicApi {
    async fn signup(&self, payload: &SignupPayload) -> Result<TokenResponse> {
        let mut state = self.enter("signup")?;
        if state.accounts.contains_key(&payload.email) {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let id = state.users.len() as i64 + 100;
        let token = format!("token-{}", id);
        let user = UpstreamUser {
            id,
            name: payload.name.clone(),
            email: payload.email.clone(),
            role: UserRole::Citizen,
            ward: payload.ward.clone(),
            created_at: Some(Utc::now()),
        };
        state.accounts.insert(
            payload.email.clone(),
            (payload.password.clone(), token.clone()),
        );
        state.users.insert(token.clone(), user.clone());

        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse> {
        let state = self.enter("login")?;
        let token = match state.accounts.get(&payload.email) {
            Some((password, token)) if *password == payload.password => token.clone(),
            _ => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
        };
        let user = user_for(&state, &token)?;

        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn me(&self, token: &str) -> Result<UpstreamUser> {
        let state = self.enter("me")?;
        user_for(&state, token)
    }

    async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<IssueReport>> {
        let state = self.enter("list_reports")?;
        Ok(state
            .reports
            .iter()
            .filter(|r| query.issue_type.is_none() || r.issue_type == query.issue_type)
            .filter(|r| query.status.is_none() || r.status == query.status)
            .skip(query.skip.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn my_reports(&self, token: &str) -> Result<Vec<IssueReport>> {
        let state = self.enter("my_reports")?;
        let user = user_for(&state, token)?;
        Ok(state
            .reports
            .iter()
            .filter(|r| r.user_id == Some(user.id))
            .cloned()
            .collect())
    }

    async fn get_report(&self, id: i64) -> Result<IssueReport> {
        let mut state = self.enter("get_report")?;
        report_mut(&mut state, id).map(|r| r.clone())
    }

    async fn create_report(
        &self,
        token: &str,
        payload: &CreateReportPayload,
    ) -> Result<IssueReport> {
        let mut state = self.enter("create_report")?;
        let user = user_for(&state, token)?;

        let id = state.reports.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = IssueReport {
            id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            image_url: payload.image_url.clone(),
            issue_type: Some(payload.issue_type),
            latitude: payload.latitude,
            longitude: payload.longitude,
            address: payload.address.clone(),
            status: Some(ReportStatus::Submitted),
            priority: Some(Priority::Low),
            priority_score: 0.0,
            upvote_count: 0,
            is_duplicate: false,
            is_hotspot: false,
            sla_deadline: Some(now + Duration::hours(72)),
            created_at: Some(now),
            user_id: Some(user.id),
            department_id: None,
            department: None,
            status_history: Vec::new(),
        };
        state.reports.push(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        token: &str,
        id: i64,
        payload: &StatusUpdatePayload,
    ) -> Result<IssueReport> {
        let mut state = self.enter("update_status")?;
        let user = user_for(&state, token)?;
        if !user.role.is_staff() {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        let report = report_mut(&mut state, id)?;
        report.status_history.push(StatusHistoryEntry {
            id: None,
            old_status: report.status,
            new_status: Some(payload.status),
            remark: payload.remark.clone(),
            timestamp: Some(Utc::now()),
        });
        report.status = Some(payload.status);
        Ok(report.clone())
    }

    async fn cast_vote(&self, token: &str, report_id: i64) -> Result<Vote> {
        let mut state = self.enter("cast_vote")?;
        let user = user_for(&state, token)?;
        if !state.votes.insert((user.id, report_id)) {
            return Err(AppError::BadRequest("Already voted".to_string()));
        }

        let report = report_mut(&mut state, report_id)?;
        report.upvote_count += 1;
        Ok(Vote {
            id: report.upvote_count as i64,
            user_id: user.id,
            report_id,
            created_at: Some(Utc::now()),
        })
    }

    async fn remove_vote(&self, token: &str, report_id: i64) -> Result<()> {
        let mut state = self.enter("remove_vote")?;
        let user = user_for(&state, token)?;
        if !state.votes.remove(&(user.id, report_id)) {
            return Err(AppError::NotFound("Vote not found".to_string()));
        }

        let report = report_mut(&mut state, report_id)?;
        report.upvote_count = report.upvote_count.saturating_sub(1);
        Ok(())
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        let state = self.enter("list_departments")?;
        Ok(state.departments.clone())
    }

    async fn department_reports(&self, department_id: i64) -> Result<Vec<IssueReport>> {
        let state = self.enter("department_reports")?;
        Ok(state
            .reports
            .iter()
            .filter(|r| r.department_id == Some(department_id))
            .cloned()
            .collect())
    }
}

// =============================================================================
// SESSION INJECTION
// =============================================================================

/// Run `router` as if `user` had presented `token`
pub fn with_session(router: Router, token: &str, user: UpstreamUser) -> Router {
    let session = Session::new(token, user);
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let session = session.clone();
            async move {
                request.extensions_mut().insert(session);
                next.run(request).await
            }
        },
    ))
}
