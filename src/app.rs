//! Application state management for labtrack.
//!
//! This module contains the core `App` struct that manages all application
//! state: the session store, the API client, per-tab table data, form state,
//! and background refresh coordination.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, SignupRequest};
use crate::auth::{guard, CredentialStore, Role, SessionStore};
use crate::config::Config;
use crate::models::{Document, Milestone, NewMilestone, NewProject, Project};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 gives refresh bursts (a handful of API calls) plenty of headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
/// Usernames are typically email addresses, 50 chars covers most.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for free-text form fields (titles, summaries, paths).
const MAX_FIELD_LENGTH: usize = 200;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Projects,
    Milestones,
    Documents,
    Account,
    Admin,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::Milestones => "Milestones",
            Tab::Documents => "Documents",
            Tab::Account => "Account",
            Tab::Admin => "Admin",
        }
    }

    /// Role required to enter this tab, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Tab::Admin => Some(Role::Admin),
            _ => None,
        }
    }

    /// All tabs in display order.
    pub const ALL: [Tab; 5] = [
        Tab::Projects,
        Tab::Milestones,
        Tab::Documents,
        Tab::Account,
        Tab::Admin,
    ];

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    Registering,
    AddingProject,
    AddingMilestone,
    AddingDocument,
    ConfirmingDelete,
    Quitting,
}

/// Login form state
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: usize,
    pub error: Option<String>,
}

/// Registration form state
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role_index: usize,
    pub focus: usize,
    pub error: Option<String>,
}

impl RegisterForm {
    pub fn role(&self) -> Role {
        Role::ALL[self.role_index % Role::ALL.len()]
    }
}

/// Create-project form state
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub title: String,
    pub summary: String,
    pub start_date: String,
    pub end_date: String,
    pub focus: usize,
}

/// Create-milestone form state
#[derive(Debug, Default)]
pub struct MilestoneForm {
    pub title: String,
    pub due_date: String,
    pub focus: usize,
}

/// Upload-document form state
#[derive(Debug, Default)]
pub struct DocumentForm {
    pub title: String,
    pub path: String,
    pub focus: usize,
}

/// What the delete confirmation dialog will remove
#[derive(Debug, Clone)]
pub enum PendingDelete {
    Project { id: String, title: String },
    Milestone { id: String, title: String },
    Document { id: String, title: String },
}

impl PendingDelete {
    pub fn describe(&self) -> String {
        match self {
            PendingDelete::Project { title, .. } => format!("project \"{}\"", title),
            PendingDelete::Milestone { title, .. } => format!("milestone \"{}\"", title),
            PendingDelete::Document { title, .. } => format!("document \"{}\"", title),
        }
    }
}

/// Results delivered from background refresh tasks
pub enum RefreshResult {
    Projects(Result<Vec<Project>>),
    ProjectDetail {
        project_id: String,
        result: Result<Project>,
    },
    Milestones {
        project_id: String,
        result: Result<Vec<Milestone>>,
    },
    Documents {
        project_id: String,
        result: Result<Vec<Document>>,
    },
}

// ============================================================================
// App
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub status_message: Option<String>,

    // Forms
    pub login_form: LoginForm,
    pub register_form: RegisterForm,
    pub project_form: ProjectForm,
    pub milestone_form: MilestoneForm,
    pub document_form: DocumentForm,

    // Table data
    pub projects: Vec<Project>,
    pub milestones: Vec<Milestone>,
    pub documents: Vec<Document>,
    /// Freshly fetched detail for the active project, shown above its
    /// milestone and document tables.
    pub active_project_detail: Option<Project>,

    // Selection indices
    pub project_selection: usize,
    pub milestone_selection: usize,
    pub document_selection: usize,
    /// Index into `projects` for the project selector on the milestone and
    /// document tabs.
    pub active_project: usize,

    pub pending_delete: Option<PendingDelete>,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
}

impl App {
    /// Create a new application instance, rehydrating any persisted session.
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = Config::data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        let session = Arc::new(SessionStore::new(data_dir));
        match session.initialize() {
            Ok(restored) => debug!(restored, "Session initialized"),
            Err(e) => warn!(error = %e, "Failed to initialize session"),
        }

        Self::with_parts(config, session)
    }

    fn with_parts(config: Config, session: Arc<SessionStore>) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url(), session.clone())?;
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Prefill the login form from env vars, config, and the keychain
        let username = std::env::var("LABTRACK_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();

        let password = std::env::var("LABTRACK_PASSWORD")
            .ok()
            .or_else(|| {
                if !username.is_empty() && CredentialStore::has_credentials(&username) {
                    CredentialStore::get_password(&username).ok()
                } else {
                    None
                }
            })
            .unwrap_or_default();

        let focus = if username.is_empty() { 0 } else { 1 };

        Ok(Self {
            config,
            session,
            api,

            state: AppState::Normal,
            current_tab: Tab::Projects,
            status_message: None,

            login_form: LoginForm {
                username,
                password,
                focus,
                error: None,
            },
            register_form: RegisterForm {
                // MEMBER is the default role on the signup form
                role_index: 2,
                ..Default::default()
            },
            project_form: ProjectForm::default(),
            milestone_form: MilestoneForm::default(),
            document_form: DocumentForm::default(),

            projects: Vec::new(),
            milestones: Vec::new(),
            documents: Vec::new(),
            active_project_detail: None,

            project_selection: 0,
            milestone_selection: 0,
            document_selection: 0,
            active_project: 0,

            pending_delete: None,

            refresh_rx: rx,
            refresh_tx: tx,
        })
    }

    // =========================================================================
    // Session accessors
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.session.identity().map(|c| c.role)
    }

    /// Username the backend expects on ownership-tagged writes.
    pub fn current_user(&self) -> Option<String> {
        self.session.identity().map(|c| c.sub)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Show the login overlay.
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_form.focus = if self.login_form.username.is_empty() { 0 } else { 1 };
        self.login_form.error = None;
    }

    /// Show the registration form.
    pub fn start_register(&mut self) {
        self.state = AppState::Registering;
        self.register_form.error = None;
    }

    /// Attempt login with the credentials from the login form.
    pub async fn attempt_login(&mut self) {
        let username = self.login_form.username.trim().to_string();
        let password = self.login_form.password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_form.error = Some("Username and password required".to_string());
            return;
        }

        self.login_form.error = None;

        let token = match self.api.login(&username, &password).await {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Login failed");
                let message = match e.downcast_ref::<ApiError>() {
                    Some(ApiError::Unauthorized) => {
                        // The keychain copy is stale if the backend says no.
                        if CredentialStore::has_credentials(&username) {
                            let _ = CredentialStore::delete(&username);
                        }
                        "Invalid username or password".to_string()
                    }
                    Some(ApiError::Validation(msg)) => msg.clone(),
                    Some(other) => other.to_string(),
                    None => "Unable to connect to server".to_string(),
                };
                self.login_form.error = Some(message);
                return;
            }
        };

        match self.session.login(&token) {
            Ok(identity) => {
                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_form.password.clear();
                self.state = AppState::Normal;
                self.status_message = Some(format!("Logged in as {}", identity.sub));
                info!(sub = %identity.sub, "Login complete");
                self.refresh_all();
            }
            Err(e) => {
                // The backend issued a token the client cannot read. The
                // session is already empty; surface it like a failed login.
                error!(error = %e, "Issued token failed to decode");
                self.login_form.error =
                    Some("Server returned an unreadable token; try again".to_string());
            }
        }
    }

    /// Attempt registration with the signup form fields.
    pub async fn attempt_register(&mut self) {
        let form = &self.register_form;
        if form.username.trim().is_empty()
            || form.password.is_empty()
            || form.full_name.trim().is_empty()
        {
            self.register_form.error = Some("All fields are required".to_string());
            return;
        }

        let request = SignupRequest {
            username: form.username.trim().to_string(),
            password: form.password.clone(),
            full_name: form.full_name.trim().to_string(),
            role: form.role().as_str().to_string(),
        };
        self.register_form.error = None;

        match self.api.signup(&request).await {
            Ok(outcome) => match outcome.token {
                // The backend may issue a token right away; log straight in.
                Some(token) => match self.session.login(&token) {
                    Ok(identity) => {
                        self.config.last_username = Some(request.username);
                        if let Err(e) = self.config.save() {
                            warn!(error = %e, "Failed to save config");
                        }
                        self.state = AppState::Normal;
                        self.status_message =
                            Some(format!("Registered and logged in as {}", identity.sub));
                        self.refresh_all();
                    }
                    Err(e) => {
                        warn!(error = %e, "Signup token failed to decode");
                        self.login_form.username = request.username;
                        self.start_login();
                        self.status_message =
                            Some("Registration successful! Please login.".to_string());
                    }
                },
                None => {
                    self.login_form.username = request.username;
                    self.start_login();
                    self.status_message =
                        Some("Registration successful! Please login.".to_string());
                }
            },
            Err(e) => {
                error!(error = %e, "Registration failed");
                let message = match e.downcast_ref::<ApiError>() {
                    Some(ApiError::Validation(msg)) => msg.clone(),
                    Some(other) => other.to_string(),
                    None => "Registration failed".to_string(),
                };
                self.register_form.error = Some(message);
            }
        }
    }

    /// Clear the session and return to the login view.
    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Logout cleanup failed");
        }
        self.projects.clear();
        self.milestones.clear();
        self.documents.clear();
        self.active_project_detail = None;
        self.status_message = Some("Logged out".to_string());
        self.start_login();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to a tab, routing through the role guard. A denied selection
    /// redirects to the login view, matching what the web client's protected
    /// routes do.
    pub fn select_tab(&mut self, tab: Tab) {
        if !self.is_authenticated() {
            self.start_login();
            return;
        }
        if guard::allow(tab.required_role(), self.current_role()) {
            self.current_tab = tab;
        } else {
            debug!(tab = tab.title(), "Tab selection denied by role guard");
            self.status_message = Some(format!("{} requires a different role", tab.title()));
            self.start_login();
        }
    }

    /// Whether the tab bar should offer this tab at all.
    pub fn tab_visible(&self, tab: Tab) -> bool {
        guard::allow(tab.required_role(), self.current_role())
    }

    pub fn next_tab(&mut self) {
        if let Some(tab) = self.neighbor_tab(1) {
            self.select_tab(tab);
        }
    }

    pub fn prev_tab(&mut self) {
        if let Some(tab) = self.neighbor_tab(Tab::ALL.len() - 1) {
            self.select_tab(tab);
        }
    }

    fn neighbor_tab(&self, step: usize) -> Option<Tab> {
        let count = Tab::ALL.len();
        let mut index = self.current_tab.index();
        for _ in 0..count {
            index = (index + step) % count;
            let tab = Tab::ALL[index];
            if self.tab_visible(tab) {
                return Some(tab);
            }
        }
        None
    }

    // =========================================================================
    // Data refresh
    // =========================================================================

    /// Kick off a background refresh of the project list. Milestones and
    /// documents for the active project follow once the list arrives.
    pub fn refresh_all(&mut self) {
        self.status_message = Some("Refreshing...".to_string());
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_projects().await;
            let _ = tx.send(RefreshResult::Projects(result)).await;
        });
    }

    /// Refresh milestones and documents for the active project.
    pub fn refresh_active_project(&mut self) {
        let Some(project_id) = self.active_project_id() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            let (detail, milestones, documents) = futures::future::join3(
                api.fetch_project(&project_id),
                api.fetch_milestones(&project_id),
                api.fetch_documents(&project_id),
            )
            .await;
            let _ = tx
                .send(RefreshResult::ProjectDetail {
                    project_id: project_id.clone(),
                    result: detail,
                })
                .await;
            let _ = tx
                .send(RefreshResult::Milestones {
                    project_id: project_id.clone(),
                    result: milestones,
                })
                .await;
            let _ = tx
                .send(RefreshResult::Documents {
                    project_id,
                    result: documents,
                })
                .await;
        });
    }

    /// Drain completed background tasks and fold their results into state.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            match result {
                RefreshResult::Projects(Ok(projects)) => {
                    self.projects = projects;
                    self.clamp_selections();
                    self.status_message = None;
                    self.refresh_active_project();
                }
                RefreshResult::Projects(Err(e)) => {
                    warn!(error = %e, "Failed to load projects");
                    self.status_message = Some(format!("Failed to load projects: {}", e));
                }
                RefreshResult::ProjectDetail { project_id, result } => {
                    if Some(project_id) == self.active_project_id() {
                        match result {
                            Ok(project) => self.active_project_detail = Some(project),
                            Err(e) => {
                                // The header is decoration; the tables still load.
                                warn!(error = %e, "Failed to load project detail");
                            }
                        }
                    }
                }
                RefreshResult::Milestones { project_id, result } => {
                    // A stale result for a previously selected project is dropped.
                    if Some(project_id) == self.active_project_id() {
                        match result {
                            Ok(milestones) => {
                                self.milestones = milestones;
                                self.clamp_selections();
                            }
                            Err(e) => {
                                warn!(error = %e, "Failed to load milestones");
                                self.status_message =
                                    Some(format!("Failed to load milestones: {}", e));
                            }
                        }
                    }
                }
                RefreshResult::Documents { project_id, result } => {
                    if Some(project_id) == self.active_project_id() {
                        match result {
                            Ok(documents) => {
                                self.documents = documents;
                                self.clamp_selections();
                            }
                            Err(e) => {
                                warn!(error = %e, "Failed to load documents");
                                self.status_message =
                                    Some(format!("Failed to load documents: {}", e));
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn active_project_id(&self) -> Option<String> {
        self.projects.get(self.active_project).map(|p| p.id.clone())
    }

    /// Cycle the project selector on the milestone/document tabs.
    pub fn cycle_active_project(&mut self, forward: bool) {
        if self.projects.is_empty() {
            return;
        }
        let count = self.projects.len();
        self.active_project = if forward {
            (self.active_project + 1) % count
        } else {
            (self.active_project + count - 1) % count
        };
        self.milestones.clear();
        self.documents.clear();
        self.active_project_detail = None;
        self.refresh_active_project();
    }

    fn clamp_selections(&mut self) {
        self.project_selection = self.project_selection.min(self.projects.len().saturating_sub(1));
        self.milestone_selection = self
            .milestone_selection
            .min(self.milestones.len().saturating_sub(1));
        self.document_selection = self
            .document_selection
            .min(self.documents.len().saturating_sub(1));
        self.active_project = self.active_project.min(self.projects.len().saturating_sub(1));
    }

    // =========================================================================
    // Create / delete operations
    // =========================================================================

    /// Submit the create-project form.
    pub async fn submit_project_form(&mut self) {
        if self.project_form.title.trim().is_empty() {
            self.status_message = Some("Project title is required".to_string());
            return;
        }

        let project = NewProject {
            title: self.project_form.title.trim().to_string(),
            summary: self.project_form.summary.trim().to_string(),
            start_date: self.project_form.start_date.trim().to_string(),
            end_date: self.project_form.end_date.trim().to_string(),
        };

        match self.api.create_project(&project).await {
            Ok(()) => {
                self.project_form = ProjectForm::default();
                self.state = AppState::Normal;
                self.refresh_all();
            }
            Err(e) => {
                error!(error = %e, "Project creation failed");
                self.status_message = Some(format!("Project creation failed: {}", e));
            }
        }
    }

    /// Submit the create-milestone form for the active project.
    pub async fn submit_milestone_form(&mut self) {
        let Some(project_id) = self.active_project_id() else {
            self.status_message = Some("Select a project first".to_string());
            return;
        };
        let Some(username) = self.current_user() else {
            self.status_message = Some("Not logged in".to_string());
            return;
        };
        if self.milestone_form.title.trim().is_empty()
            || self.milestone_form.due_date.trim().is_empty()
        {
            self.status_message = Some("Milestone title and due date required".to_string());
            return;
        }

        let milestone = NewMilestone {
            title: self.milestone_form.title.trim().to_string(),
            due_date: self.milestone_form.due_date.trim().to_string(),
        };

        match self
            .api
            .create_milestone(&project_id, &milestone, &username)
            .await
        {
            Ok(()) => {
                self.milestone_form = MilestoneForm::default();
                self.state = AppState::Normal;
                self.refresh_active_project();
            }
            Err(e) => {
                error!(error = %e, "Milestone creation failed");
                self.status_message = Some(format!("Failed to add milestone: {}", e));
            }
        }
    }

    /// Submit the upload-document form for the active project.
    pub async fn submit_document_form(&mut self) {
        let Some(project_id) = self.active_project_id() else {
            self.status_message = Some("Select a project first".to_string());
            return;
        };
        let Some(user_id) = self.current_user() else {
            self.status_message = Some("Not logged in".to_string());
            return;
        };
        let path = PathBuf::from(self.document_form.path.trim());
        if self.document_form.title.trim().is_empty() || path.as_os_str().is_empty() {
            self.status_message = Some("Document title and file path required".to_string());
            return;
        }

        let title = self.document_form.title.trim().to_string();
        match self
            .api
            .upload_document(&project_id, &title, &path, &user_id)
            .await
        {
            Ok(()) => {
                self.document_form = DocumentForm::default();
                self.state = AppState::Normal;
                self.refresh_active_project();
            }
            Err(e) => {
                error!(error = %e, "Document upload failed");
                self.status_message = Some(format!("File upload failed: {}", e));
            }
        }
    }

    /// Arm the delete confirmation for the current tab's selected row.
    pub fn request_delete(&mut self) {
        let pending = match self.current_tab {
            Tab::Projects => self.projects.get(self.project_selection).map(|p| {
                PendingDelete::Project {
                    id: p.id.clone(),
                    title: p.display_title().to_string(),
                }
            }),
            Tab::Milestones => self.milestones.get(self.milestone_selection).map(|m| {
                PendingDelete::Milestone {
                    id: m.id.clone(),
                    title: m.title.clone(),
                }
            }),
            Tab::Documents => self.documents.get(self.document_selection).map(|d| {
                PendingDelete::Document {
                    id: d.id.clone(),
                    title: d.title.clone(),
                }
            }),
            _ => None,
        };

        if let Some(pending) = pending {
            self.pending_delete = Some(pending);
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Execute the armed delete.
    pub async fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            self.state = AppState::Normal;
            return;
        };
        self.state = AppState::Normal;

        let result = match &pending {
            PendingDelete::Project { id, .. } => self.api.delete_project(id).await,
            PendingDelete::Milestone { id, .. } => self.api.delete_milestone(id).await,
            PendingDelete::Document { id, .. } => self.api.delete_document(id).await,
        };

        match result {
            Ok(()) => {
                self.status_message = Some(format!("Deleted {}", pending.describe()));
                match pending {
                    PendingDelete::Project { .. } => self.refresh_all(),
                    _ => self.refresh_active_project(),
                }
            }
            Err(e) => {
                error!(error = %e, "Delete failed");
                self.status_message = Some(format!("Failed to delete {}: {}", pending.describe(), e));
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// Append a character to a form field, respecting its length budget.
    pub fn push_field_char(field: &mut String, c: char, field_kind: FieldKind) {
        let limit = match field_kind {
            FieldKind::Username => MAX_USERNAME_LENGTH,
            FieldKind::Password => MAX_PASSWORD_LENGTH,
            FieldKind::Text => MAX_FIELD_LENGTH,
        };
        if field.chars().count() < limit {
            field.push(c);
        }
    }
}

/// Which length budget applies to a text field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Username,
    Password,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn token(sub: &str, role: &str) -> String {
        let head = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{}","role":"{}"}}"#, sub, role));
        format!("{}.{}.sig", head, payload)
    }

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::new(dir.path()));
        let config = Config {
            api_base_url: Some("http://localhost:9/api".to_string()),
            last_username: None,
        };
        let app = App::with_parts(config, session).unwrap();
        (app, dir)
    }

    #[test]
    fn test_admin_tab_selectable_with_admin_role() {
        let (mut app, _dir) = test_app();
        app.session.login(&token("u1", "ADMIN")).unwrap();

        app.select_tab(Tab::Admin);
        assert_eq!(app.current_tab, Tab::Admin);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_admin_tab_redirects_member_to_login() {
        let (mut app, _dir) = test_app();
        app.session.login(&token("u1", "MEMBER")).unwrap();

        app.select_tab(Tab::Admin);
        assert_ne!(app.current_tab, Tab::Admin);
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[test]
    fn test_logout_then_admin_navigation_redirects_to_login() {
        let (mut app, _dir) = test_app();
        app.session.login(&token("u1", "ADMIN")).unwrap();
        app.select_tab(Tab::Admin);
        assert_eq!(app.current_tab, Tab::Admin);

        app.logout();
        assert!(!app.is_authenticated());

        app.state = AppState::Normal;
        app.select_tab(Tab::Admin);
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[test]
    fn test_tab_cycling_skips_gated_tabs_for_members() {
        let (mut app, _dir) = test_app();
        app.session.login(&token("u1", "VIEWER")).unwrap();

        assert!(!app.tab_visible(Tab::Admin));
        app.current_tab = Tab::Account;
        app.next_tab();
        // Admin is skipped; the cycle wraps back to Projects.
        assert_eq!(app.current_tab, Tab::Projects);
    }

    #[test]
    fn test_field_length_budgets() {
        let mut field = "x".repeat(MAX_USERNAME_LENGTH);
        App::push_field_char(&mut field, 'y', FieldKind::Username);
        assert_eq!(field.chars().count(), MAX_USERNAME_LENGTH);

        let mut text = String::new();
        App::push_field_char(&mut text, 'a', FieldKind::Text);
        assert_eq!(text, "a");
    }
}
