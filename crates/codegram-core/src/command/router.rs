//! Command router: dispatches slash commands to their handlers and sends
//! the resulting reply.

use codegram_types::error::{CommandError, TransportError};
use codegram_types::project::Project;
use codegram_types::session::Session;
use codegram_types::user::User;
use tracing::{debug, warn};

use super::{CommandKind, lookup, parse};
use crate::agent::backend::AgentBackend;
use crate::chat::transport::ChatTransport;
use crate::repository::project::ProjectRepository;
use crate::repository::session::SessionRepository;
use crate::service::project::ProjectService;
use crate::service::provision::ProjectProvisioner;
use crate::service::session::SessionCoordinator;

pub const WELCOME_TEXT: &str = "Welcome! I'm your AI coding assistant.\n\n\
Commands:\n\
/newproject <name> - Create a new project\n\
/projects - List your projects\n\
/sessions - List your sessions\n\
/newsession - Start a fresh session\n\
/help - Show this message\n\n\
Just send me a message to start chatting!";

pub const HELP_TEXT: &str = "*Available Commands:*\n\n\
/newproject <name> - Create a new project with git repo\n\
/projects - List all your projects\n\
/sessions - List your recent sessions\n\
/newsession - Start a fresh conversation\n\
/project <name> - Switch to a project context\n\
/help - Show this message\n\n\
Send any message to interact with the AI agent.";

pub const UNKNOWN_COMMAND_TEXT: &str = "Unknown command. Use /help to see available commands.";
pub const NO_SESSIONS_TEXT: &str =
    "You don't have any sessions yet. Start chatting to create one!";
pub const NEW_SESSION_TEXT: &str =
    "Started a new session. Your previous sessions are still saved.";
pub const NO_PROJECTS_TEXT: &str =
    "You don't have any projects yet.\n\nUse /newproject <name> to create one!";

const NEW_PROJECT_USAGE: &str = "Please provide a project name.\n\nUsage: /newproject my-awesome-app";
const PROJECT_USAGE: &str = "Please specify a project name.\n\nUsage: /project my-app";

/// Routes slash commands and owns the services they act on.
pub struct CommandRouter<P, F, S, A, T>
where
    P: ProjectRepository,
    F: ProjectProvisioner,
    S: SessionRepository,
    A: AgentBackend,
    T: ChatTransport,
{
    projects: ProjectService<P, F>,
    sessions: SessionCoordinator<S, A>,
    transport: T,
    session_list_limit: u32,
}

impl<P, F, S, A, T> CommandRouter<P, F, S, A, T>
where
    P: ProjectRepository,
    F: ProjectProvisioner,
    S: SessionRepository,
    A: AgentBackend,
    T: ChatTransport,
{
    pub fn new(
        projects: ProjectService<P, F>,
        sessions: SessionCoordinator<S, A>,
        transport: T,
        session_list_limit: u32,
    ) -> Self {
        Self {
            projects,
            sessions,
            transport,
            session_list_limit,
        }
    }

    pub fn projects(&self) -> &ProjectService<P, F> {
        &self.projects
    }

    pub fn sessions(&self) -> &SessionCoordinator<S, A> {
        &self.sessions
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle `text` if it is a command.
    ///
    /// Returns `Ok(false)` only for text without the command prefix, which
    /// the caller relays to the agent. Prefixed text that matches no command
    /// gets the unknown-command reply and counts as handled. The only error
    /// is a failure to deliver the reply.
    pub async fn route(&self, chat_id: i64, user: &User, text: &str) -> Result<bool, TransportError> {
        let Some(parsed) = parse(text) else {
            return Ok(false);
        };

        let reply = match lookup(&parsed.name) {
            Some(spec) => {
                debug!(telegram_id = user.telegram_id, command = spec.name, "Dispatching command");
                let args = if spec.args_required { parsed.args } else { "" };
                self.dispatch(spec.kind, chat_id, user, args)
                    .await
                    .unwrap_or_else(|e| e.to_string())
            }
            None => UNKNOWN_COMMAND_TEXT.to_string(),
        };

        self.transport.send_text(chat_id, &reply).await?;
        Ok(true)
    }

    async fn dispatch(
        &self,
        kind: CommandKind,
        chat_id: i64,
        user: &User,
        args: &str,
    ) -> Result<String, CommandError> {
        match kind {
            CommandKind::Start => Ok(WELCOME_TEXT.to_string()),
            CommandKind::Help => Ok(HELP_TEXT.to_string()),
            CommandKind::Sessions => self.list_sessions(user).await,
            CommandKind::NewSession => {
                self.sessions.start_fresh(user).await?;
                Ok(NEW_SESSION_TEXT.to_string())
            }
            CommandKind::Projects => self.list_projects(user).await,
            CommandKind::NewProject => self.new_project(chat_id, user, args).await,
            CommandKind::Project => self.switch_project(chat_id, user, args).await,
        }
    }

    async fn list_sessions(&self, user: &User) -> Result<String, CommandError> {
        let sessions = self
            .sessions
            .recent_sessions(user, self.session_list_limit)
            .await?;
        Ok(render_sessions(&sessions))
    }

    async fn list_projects(&self, user: &User) -> Result<String, CommandError> {
        let projects = self.projects.list_projects(user.id).await?;
        Ok(render_projects(&projects))
    }

    async fn new_project(&self, chat_id: i64, user: &User, args: &str) -> Result<String, CommandError> {
        if args.is_empty() {
            return Err(CommandError::Usage(NEW_PROJECT_USAGE));
        }

        let (name, description) = match args.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest)),
            None => (args, None),
        };

        self.typing(chat_id).await;
        let project = self.projects.create_project(user.id, name, description).await?;

        Ok(format!(
            "Project *{name}* created!\n\n\
             Path: `{path}`\n\
             Git repo initialized with initial commit.\n\n\
             Use /project {name} to start working on it.",
            name = project.name,
            path = project.path.display(),
        ))
    }

    async fn switch_project(&self, chat_id: i64, user: &User, args: &str) -> Result<String, CommandError> {
        if args.is_empty() {
            return Err(CommandError::Usage(PROJECT_USAGE));
        }

        let project = self.projects.find_project(user.id, args).await?;

        self.typing(chat_id).await;
        self.sessions
            .switch_project(user, &project)
            .await
            .map_err(|e| CommandError::SwitchProject(e.to_string()))?;

        Ok(format!(
            "Switched to project *{name}*.\n\n\
             Working directory: `{path}`\n\n\
             Send me a message to start working on this project!",
            name = project.name,
            path = project.path.display(),
        ))
    }

    /// Send a typing indicator. Failures are logged and otherwise ignored.
    pub async fn typing(&self, chat_id: i64) {
        if let Err(e) = self.transport.send_typing(chat_id).await {
            warn!(chat_id, error = %e, "Failed to send typing indicator");
        }
    }
}

fn render_sessions(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return NO_SESSIONS_TEXT.to_string();
    }

    let mut lines = vec!["*Your Recent Sessions:*\n".to_string()];
    for (i, session) in sessions.iter().enumerate() {
        let status = if session.is_active { "Active" } else { "Ended" };
        let title = session.title.as_deref().unwrap_or("Untitled");
        lines.push(format!("{}. {title} ({status})", i + 1));
    }
    lines.join("\n")
}

fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return NO_PROJECTS_TEXT.to_string();
    }

    let mut lines = vec!["*Your Projects:*\n".to_string()];
    for project in projects {
        match project.description.as_deref() {
            Some(desc) => lines.push(format!("- *{}* - {desc}", project.name)),
            None => lines.push(format!("- *{}*", project.name)),
        }
    }
    lines.push("\n_Use /project <name> to work on a project_".to_string());
    lines.join("\n")
}
