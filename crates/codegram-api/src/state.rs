//! Application state wiring all services together.
//!
//! Core services are generic over their ports; the aliases here pin them to
//! the concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use codegram_core::command::router::CommandRouter;
use codegram_core::gateway::Gateway;
use codegram_core::service::access::AccessPolicy;
use codegram_core::service::project::ProjectService;
use codegram_core::service::session::SessionCoordinator;
use codegram_infra::agent::opencode::OpencodeClient;
use codegram_infra::config::load_gateway_config;
use codegram_infra::filesystem::projects_root;
use codegram_infra::filesystem::provisioner::GitProjectProvisioner;
use codegram_infra::sqlite::pool::DatabasePool;
use codegram_infra::sqlite::project::SqliteProjectRepository;
use codegram_infra::sqlite::session::SqliteSessionRepository;
use codegram_infra::sqlite::user::SqliteUserRepository;
use codegram_infra::telegram::client::TelegramClient;
use codegram_types::config::GatewayConfig;
use secrecy::SecretString;

pub type ConcreteProjectService = ProjectService<SqliteProjectRepository, GitProjectProvisioner>;

pub type ConcreteGateway = Gateway<
    SqliteUserRepository,
    SqliteProjectRepository,
    GitProjectProvisioner,
    SqliteSessionRepository,
    OpencodeClient,
    TelegramClient,
>;

/// Runtime options for the webhook server, built once at startup.
pub struct Settings {
    pub telegram_token: SecretString,
    pub backend_url: String,
    pub allow_all_users: bool,
    pub whitelist: Vec<i64>,
    pub data_dir: PathBuf,
}

/// Shared state handed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ConcreteGateway>,
}

impl AppState {
    /// Open the store, load `config.toml`, and wire the gateway.
    pub async fn init(settings: Settings) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&settings.data_dir).await?;
        let config = load_gateway_config(&settings.data_dir).await;
        let pool = DatabasePool::open(&settings.data_dir).await?;

        let telegram = TelegramClient::new(settings.telegram_token, config.max_reply_chars);
        let backend = OpencodeClient::from_config(settings.backend_url, &config);
        let access = AccessPolicy::new(settings.allow_all_users, settings.whitelist);

        Ok(Self::wire(pool, &settings.data_dir, &config, access, backend, telegram))
    }

    /// Assemble the gateway from already-built adapters.
    pub fn wire(
        pool: DatabasePool,
        data_dir: &Path,
        config: &GatewayConfig,
        access: AccessPolicy,
        backend: OpencodeClient,
        telegram: TelegramClient,
    ) -> Self {
        let projects = ProjectService::new(
            SqliteProjectRepository::new(pool.clone()),
            GitProjectProvisioner::new(projects_root(data_dir)),
        );
        let sessions = SessionCoordinator::new(SqliteSessionRepository::new(pool.clone()), backend);
        let router = CommandRouter::new(projects, sessions, telegram, config.session_list_limit);
        let gateway = Gateway::new(SqliteUserRepository::new(pool), access, router);

        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// State for the admin subcommands: the store only, no network clients.
pub struct AdminState {
    pub users: SqliteUserRepository,
    pub projects: ConcreteProjectService,
    pub sessions: SqliteSessionRepository,
}

impl AdminState {
    pub async fn init(data_dir: &Path) -> anyhow::Result<Self> {
        let pool = DatabasePool::open(data_dir).await?;
        Ok(Self {
            users: SqliteUserRepository::new(pool.clone()),
            sessions: SqliteSessionRepository::new(pool.clone()),
            projects: ProjectService::new(
                SqliteProjectRepository::new(pool),
                GitProjectProvisioner::new(projects_root(data_dir)),
            ),
        })
    }
}
