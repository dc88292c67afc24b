/// Walks through a login, refresh and revoke cycle against the in-memory backend.
///
/// Run with `cargo run --bin session_demo`. Nothing is persisted.
use chirpy::application_port::{CredentialsInput, LoginInput};
use chirpy::domain_port::SystemClock;
use chirpy::server::Server;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::new("session_demo=debug,chirpy=debug");

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let server = Server::in_memory("demo-secret", Arc::new(SystemClock), true, "public");

    let user = server
        .user_service
        .create_user(CredentialsInput {
            email: "walt@breakingbad.com".to_string(),
            password: "123456".to_string(),
        })
        .await?;
    info!(user_id = %user.id, "signed up");

    let session = server
        .session_service
        .login(LoginInput {
            email: user.email.clone(),
            password: "123456".to_string(),
        })
        .await?;
    info!(access = %session.access_token.0, refresh = %session.refresh_token.0, "logged in");

    let authorization = format!("Bearer {}", session.access_token.0);
    let principal = server
        .authorization_gate
        .authenticate(Some(authorization.as_str()))?;
    info!(%principal, "access token accepted");

    let refreshed = server
        .session_service
        .refresh(&session.refresh_token.0)
        .await?;
    info!(access = %refreshed.0, "refreshed");

    server.session_service.revoke(&session.refresh_token.0).await?;
    match server.session_service.refresh(&session.refresh_token.0).await {
        Ok(_) => info!("unexpected: revoked token still refreshes"),
        Err(e) => info!(error = %e, "revoked token rejected"),
    }

    Ok(())
}
