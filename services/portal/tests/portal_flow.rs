//! End-to-end tests of the portal stores over the file backend
//!
//! These tests drive a whole session through `AppContext`, then rebuild the
//! context from the same directory to check what survives a restart.

use std::time::Duration;

use common::{StorageBackend, StorageConfig};
use portal::models::{PlatformId, UpdateUser};
use portal::{AppContext, Language, PortalConfig, PortalError, SessionState};
use tempfile::TempDir;

fn config_for(temp: &TempDir) -> PortalConfig {
    PortalConfig {
        storage: StorageConfig {
            backend: StorageBackend::File(temp.path().to_path_buf()),
        },
        latency: Duration::ZERO,
        locale: None,
    }
}

#[tokio::test]
async fn test_session_survives_restart() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    let context = AppContext::init(&config_for(&temp))?;
    assert!(context.identity.register("p1@dots.games", "player_one", "s3cret").await?);
    assert!(context.identity.link_platform("playstation", "p1_psn").await?);
    assert!(context.identity.link_platform("steam", "p1_steam").await?);
    assert!(context.identity.unlink_platform("playstation").await?);
    assert!(
        context
            .identity
            .update_profile(UpdateUser {
                profile_image: Some(Some("p1.png".to_string())),
                ..Default::default()
            })
            .await?
    );
    context.localization.set_language(Language::Ja)?;

    let user = context.identity.current_user();
    let platforms = context.identity.all_platforms();
    context.shutdown().await;

    let restarted = AppContext::init(&config_for(&temp))?;
    assert_eq!(restarted.identity.session_state(), SessionState::Authenticated);
    assert_eq!(restarted.identity.current_user(), user);
    assert_eq!(restarted.identity.all_platforms(), platforms);

    let linked = restarted.identity.linked_platforms();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, PlatformId::Steam);
    assert_eq!(linked[0].username(), Some("p1_steam"));

    assert_eq!(restarted.localization.language(), Language::Ja);
    assert_eq!(restarted.localization.t("platform.link"), "連携");

    Ok(())
}

#[tokio::test]
async fn test_logout_is_persisted_but_accounts_remain() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    let context = AppContext::init(&config_for(&temp))?;
    assert!(context.identity.register("p2@dots.games", "player_two", "pw").await?);
    context.identity.logout()?;
    context.identity.logout()?;
    assert!(!temp.path().join("user.json").exists());
    context.shutdown().await;

    let restarted = AppContext::init(&config_for(&temp))?;
    assert_eq!(restarted.identity.session_state(), SessionState::Unauthenticated);
    assert!(
        !restarted
            .identity
            .update_profile(UpdateUser {
                username: Some("intruder".to_string()),
                ..Default::default()
            })
            .await?
    );
    assert!(!temp.path().join("user.json").exists());

    assert!(restarted.identity.login("p2@dots.games", "pw").await?);
    assert_eq!(restarted.identity.current_user().unwrap().username, "player_two");

    Ok(())
}

#[tokio::test]
async fn test_corrupt_platform_snapshot_fails_startup() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    std::fs::write(
        temp.path().join("platforms.json"),
        r#"[{"id":"nintendo","name":"Nintendo","icon":"nintendo","isLinked":false,"username":"luigi"}]"#,
    )?;

    let result = AppContext::init(&config_for(&temp));
    assert!(matches!(result, Err(PortalError::Corrupt { key: "platforms", .. })));

    Ok(())
}

#[tokio::test]
async fn test_all_platforms_always_five() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let context = AppContext::init(&config_for(&temp))?;
    assert_eq!(context.identity.all_platforms().len(), 5);

    assert!(context.identity.register("p3@dots.games", "player_three", "pw").await?);
    for id in PlatformId::ALL {
        context.identity.link_platform(id.as_str(), "same").await?;
        assert_eq!(context.identity.all_platforms().len(), 5);
    }
    assert_eq!(context.identity.linked_platforms().len(), 5);

    Ok(())
}
