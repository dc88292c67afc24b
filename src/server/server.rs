use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::MemoryStore;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::server::HitCounter;
use crate::settings::Settings;
use anyhow::anyhow;
use sqlx::MySqlPool;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Server {
    pub session_service: Arc<dyn SessionService>,
    pub authorization_gate: Arc<dyn AuthorizationGate>,
    pub user_service: Arc<dyn UserService>,
    pub chirp_service: Arc<dyn ChirpService>,
    pub hit_counter: Arc<HitCounter>,
    pub is_dev: bool,
    pub static_dir: PathBuf,
    pool: Option<MySqlPool>,
}

struct Repos {
    user_repo: Arc<dyn UserRepo>,
    chirp_repo: Arc<dyn ChirpRepo>,
    refresh_token_repo: Arc<dyn RefreshTokenRepo>,
}

impl Repos {
    fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Repos {
            user_repo: store.clone(),
            chirp_repo: store.clone(),
            refresh_token_repo: store,
        }
    }

    fn mysql(pool: &MySqlPool) -> Self {
        Repos {
            user_repo: Arc::new(MySqlUserRepo::new(pool.clone())),
            chirp_repo: Arc::new(MySqlChirpRepo::new(pool.clone())),
            refresh_token_repo: Arc::new(MySqlRefreshTokenRepo::new(pool.clone())),
        }
    }
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (repos, pool) = match settings.database.backend.as_str() {
            "memory" => (Repos::memory(), None),
            "mysql" => {
                let dsn = settings
                    .database
                    .dsn
                    .as_deref()
                    .ok_or_else(|| anyhow!("database.dsn is required for the mysql backend"))?;
                let pool = MySqlPool::connect(dsn).await?;
                (Repos::mysql(&pool), Some(pool))
            }
            other => return Err(anyhow!("Unknown database backend: {}", other)),
        };

        let server = Self::assemble(
            repos,
            settings.auth.jwt_secret.as_bytes(),
            Arc::new(SystemClock),
            settings.is_dev(),
            PathBuf::from(&settings.http.static_dir),
            pool,
        );

        info!(backend = %settings.database.backend, platform = %settings.platform, "server started");
        Ok(server)
    }

    /// A server on the in-memory backend, with the clock supplied by the caller.
    pub fn in_memory(
        jwt_secret: &str,
        clock: Arc<dyn Clock>,
        is_dev: bool,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::assemble(
            Repos::memory(),
            jwt_secret.as_bytes(),
            clock,
            is_dev,
            static_dir.into(),
            None,
        )
    }

    fn assemble(
        repos: Repos,
        jwt_secret: &[u8],
        clock: Arc<dyn Clock>,
        is_dev: bool,
        static_dir: PathBuf,
        pool: Option<MySqlPool>,
    ) -> Self {
        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher);
        let token_signer: Arc<dyn TokenSigner> =
            Arc::new(JwtTokenSigner::new(jwt_secret, clock.clone()));
        let token_generator: Arc<dyn OpaqueTokenGenerator> = Arc::new(HexTokenGenerator);
        let refresh_tokens = Arc::new(RefreshTokenStore::new(
            repos.refresh_token_repo,
            clock.clone(),
        ));

        let session_service: Arc<dyn SessionService> = Arc::new(RealSessionService::new(
            repos.user_repo.clone(),
            credential_hasher.clone(),
            token_signer.clone(),
            token_generator,
            refresh_tokens,
        ));
        let authorization_gate: Arc<dyn AuthorizationGate> =
            Arc::new(TokenAuthorizationGate::new(token_signer));
        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(
            repos.user_repo,
            credential_hasher,
            clock.clone(),
        ));
        let chirp_service: Arc<dyn ChirpService> =
            Arc::new(RealChirpService::new(repos.chirp_repo, clock));

        Self {
            session_service,
            authorization_gate,
            user_service,
            chirp_service,
            hit_counter: Arc::new(HitCounter::new()),
            is_dev,
            static_dir,
            pool,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
