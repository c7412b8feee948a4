//! Hand-written doubles for the core ports, shared by unit tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use codegram_types::error::{AgentError, ProvisionError, RepositoryError, TransportError};
use codegram_types::project::{NewProject, Project, ProjectId};
use codegram_types::session::{NewSession, Session, SessionId, SessionScope};
use codegram_types::user::{User, UserContact, UserId};
use serde_json::json;

use crate::agent::backend::{AgentBackend, CreateSessionRequest};
use crate::agent::reply::AgentReply;
use crate::chat::transport::ChatTransport;
use crate::repository::project::ProjectRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::service::provision::{ProjectProvisioner, sanitize_project_name};

pub fn test_user(id: i64, telegram_id: i64) -> User {
    User {
        id: UserId(id),
        telegram_id,
        username: Some(format!("user{telegram_id}")),
        first_name: None,
        last_name: None,
        is_whitelisted: false,
        created_at: Utc::now(),
        last_active_at: Utc::now(),
    }
}

pub fn test_session(id: i64, owner: i64) -> Session {
    Session {
        id: SessionId(id),
        owner_id: UserId(owner),
        project_id: None,
        backend_session_id: format!("ses_{id}"),
        title: Some("Telegram - test".to_string()),
        is_active: true,
        created_at: Utc::now(),
        last_message_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl UserRepository for InMemoryUsers {
    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.telegram_id == telegram_id).cloned())
    }

    async fn upsert_contact(&self, contact: &UserContact) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(user) = rows.iter_mut().find(|u| u.telegram_id == contact.telegram_id) {
            if contact.username.is_some() {
                user.username = contact.username.clone();
            }
            if contact.first_name.is_some() {
                user.first_name = contact.first_name.clone();
            }
            if contact.last_name.is_some() {
                user.last_name = contact.last_name.clone();
            }
            user.last_active_at = Utc::now();
            return Ok(user.clone());
        }

        let user = User {
            id: UserId(rows.len() as i64 + 1),
            telegram_id: contact.telegram_id,
            username: contact.username.clone(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            is_whitelisted: false,
            created_at: Utc::now(),
            last_active_at: Utc::now(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn set_whitelisted(&self, telegram_id: i64, whitelisted: bool) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|u| u.telegram_id == telegram_id) {
            Some(user) => {
                user.is_whitelisted = whitelisted;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryProjects {
    rows: Mutex<Vec<Project>>,
    next_id: AtomicUsize,
    name_lookups: AtomicUsize,
}

impl InMemoryProjects {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Number of `get_by_name` calls served so far.
    pub fn name_lookups(&self) -> usize {
        self.name_lookups.load(Ordering::SeqCst)
    }
}

impl ProjectRepository for InMemoryProjects {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_name(&self, owner_id: UserId, name: &str) -> Result<Option<Project>, RepositoryError> {
        self.name_lookups.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|p| p.owner_id == owner_id && p.name == name)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Project>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut projects: Vec<Project> = rows.iter().filter(|p| p.owner_id == owner_id).cloned().collect();
        projects.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(projects)
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|p| p.owner_id == project.owner_id && p.name == project.name)
        {
            return Err(RepositoryError::Conflict(format!("project {}", project.name)));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let row = Project {
            id: ProjectId(id),
            owner_id: project.owner_id,
            name: project.name.clone(),
            description: project.description.clone(),
            path: project.path.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn rename(&self, id: ProjectId, name: &str) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let project = rows.iter_mut().find(|p| p.id == id).ok_or(RepositoryError::NotFound)?;
        project.name = name.to_string();
        project.updated_at = Utc::now();
        Ok(())
    }

    async fn describe(&self, id: ProjectId, description: Option<&str>) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let project = rows.iter_mut().find(|p| p.id == id).ok_or(RepositoryError::NotFound)?;
        project.description = description.map(str::to_string);
        project.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    rows: Mutex<Vec<Session>>,
}

impl InMemorySessions {
    pub fn all(&self) -> Vec<Session> {
        self.rows.lock().unwrap().clone()
    }

    fn most_recent(mut sessions: Vec<Session>) -> Vec<Session> {
        sessions.sort_by(|a, b| (b.last_message_at, b.id).cmp(&(a.last_message_at, a.id)));
        sessions
    }
}

impl SessionRepository for InMemorySessions {
    async fn get_by_backend_id(&self, backend_session_id: &str) -> Result<Option<Session>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|s| s.backend_session_id == backend_session_id)
            .cloned())
    }

    async fn find_active(&self, scope: SessionScope) -> Result<Option<Session>, RepositoryError> {
        let matching = self
            .all()
            .into_iter()
            .filter(|s| s.is_active && s.scope() == scope)
            .collect();
        Ok(Self::most_recent(matching).into_iter().next())
    }

    async fn find_latest_active(&self, owner_id: UserId) -> Result<Option<Session>, RepositoryError> {
        let matching = self
            .all()
            .into_iter()
            .filter(|s| s.is_active && s.owner_id == owner_id)
            .collect();
        Ok(Self::most_recent(matching).into_iter().next())
    }

    async fn list_for_owner(&self, owner_id: UserId, limit: u32) -> Result<Vec<Session>, RepositoryError> {
        let matching = self.all().into_iter().filter(|s| s.owner_id == owner_id).collect();
        Ok(Self::most_recent(matching)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn insert(&self, session: &NewSession) -> Result<Session, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|s| s.backend_session_id == session.backend_session_id)
        {
            return Err(RepositoryError::Conflict(session.backend_session_id.clone()));
        }

        let row = Session {
            id: SessionId(rows.len() as i64 + 1),
            owner_id: session.scope.owner_id,
            project_id: session.scope.project_id,
            backend_session_id: session.backend_session_id.clone(),
            title: session.title.clone(),
            is_active: true,
            created_at: Utc::now(),
            last_message_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn touch(&self, id: SessionId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(session) = rows.iter_mut().find(|s| s.id == id) {
            session.last_message_at = Utc::now();
        }
        Ok(())
    }

    async fn set_title(&self, id: SessionId, title: &str) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(session) = rows.iter_mut().find(|s| s.id == id) {
            session.title = Some(title.to_string());
        }
        Ok(())
    }

    async fn deactivate(&self, id: SessionId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(session) = rows.iter_mut().find(|s| s.id == id) {
            session.is_active = false;
        }
        Ok(())
    }

    async fn deactivate_all_for_owner(&self, owner_id: UserId) -> Result<u64, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let mut count = 0;
        for session in rows.iter_mut().filter(|s| s.owner_id == owner_id && s.is_active) {
            session.is_active = false;
            count += 1;
        }
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Agent backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum ScriptedReply {
    Text(&'static str),
    Status(u16),
    Timeout,
    Transport(&'static str),
}

/// Agent double: mints `ses_N` ids and answers every message the same way.
pub struct ScriptedAgent {
    reply: ScriptedReply,
    fail_create: bool,
    created: Mutex<Vec<CreateSessionRequest>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedAgent {
    pub fn replying(reply: ScriptedReply) -> Self {
        Self {
            reply,
            fail_create: false,
            created: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::replying(ScriptedReply::Text("unused"))
        }
    }

    pub fn created(&self) -> Vec<CreateSessionRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl AgentBackend for ScriptedAgent {
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<String, AgentError> {
        if self.fail_create {
            return Err(AgentError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        Ok(format!("ses_{}", created.len()))
    }

    async fn send_message(&self, backend_session_id: &str, text: &str) -> Result<AgentReply, AgentError> {
        self.sent
            .lock()
            .unwrap()
            .push((backend_session_id.to_string(), text.to_string()));

        match self.reply {
            ScriptedReply::Text(text) => Ok(AgentReply::from(json!({
                "info": {"id": "msg_1"},
                "parts": [{"type": "text", "text": text}]
            }))),
            ScriptedReply::Status(status) => Err(AgentError::Status {
                status,
                body: String::new(),
            }),
            ScriptedReply::Timeout => Err(AgentError::Timeout),
            ScriptedReply::Transport(msg) => Err(AgentError::Transport(msg.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat transport
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingTransport {
    reject: bool,
    texts: Mutex<Vec<(i64, String)>>,
    typing: Mutex<Vec<i64>>,
}

impl RecordingTransport {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn typing(&self) -> Vec<i64> {
        self.typing.lock().unwrap().clone()
    }
}

impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        if self.reject {
            return Err(TransportError::Status {
                status: 400,
                description: "Bad Request: chat not found".to_string(),
            });
        }
        self.texts.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), TransportError> {
        self.typing.lock().unwrap().push(chat_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Provisioner
// ---------------------------------------------------------------------------

/// Provisioner double: computes `{root}/{owner}/{token}` without touching disk.
#[derive(Clone)]
pub struct FakeProvisioner {
    root: Option<PathBuf>,
    calls: Arc<AtomicUsize>,
}

impl FakeProvisioner {
    pub fn new(root: &str) -> Self {
        Self {
            root: Some(PathBuf::from(root)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            root: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProjectProvisioner for FakeProvisioner {
    async fn provision(&self, owner_id: UserId, name: &str) -> Result<PathBuf, ProvisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.root {
            Some(root) => Ok(root.join(owner_id.0.to_string()).join(sanitize_project_name(name))),
            None => Err(ProvisionError::Git {
                step: "init".to_string(),
                message: "git: command not found".to_string(),
            }),
        }
    }
}
