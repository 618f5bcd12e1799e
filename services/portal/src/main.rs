use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use portal::{AppContext, PortalConfig, SessionState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting account portal");

    let config = PortalConfig::from_env()?;
    let context = AppContext::init(&config)?;
    let t = |key: &str| context.localization.t(key);

    info!("{} - {}", t("app.name"), t("app.tagline"));

    match (context.identity.session_state(), context.identity.current_user()) {
        (SessionState::Authenticated, Some(user)) => {
            info!("{}, {}!", t("dashboard.welcome"), user.username);
            info!("{}: {}", t("common.email"), user.email);
        }
        _ => info!("{} / {}", t("auth.login"), t("auth.register")),
    }

    let linked = context.identity.linked_platforms();
    if linked.is_empty() {
        info!("{}", t("platform.noLinkedPlatforms"));
    } else {
        for platform in &linked {
            info!(
                "{}: {} ({})",
                t("dashboard.linkedPlatforms"),
                platform.name,
                platform.username().unwrap_or_default()
            );
        }
    }

    context.shutdown().await;

    Ok(())
}
