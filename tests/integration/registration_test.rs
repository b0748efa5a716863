//! Team registration scenarios over the in-memory store
//!
//! Drives `create_team` end to end: game resolution, the OAuth exchange, the
//! reconciler and the bot start.

mod common;

use gamebot_common::{Error, ErrorKind};
use gamebot_teams::{create_team, get_team, CreateTeamParams, TeamStore};

use crate::common::MemoryApp;

fn by_name(code: &str, game: &str) -> CreateTeamParams {
    CreateTeamParams {
        code: code.to_string(),
        game: Some(game.to_string()),
        game_id: None,
    }
}

#[tokio::test]
async fn test_install_creates_team_with_game_defaults() {
    let app = MemoryApp::new();
    let pong = app.add_game("pong", &["pp", "pongbot"]);
    app.slack.grant_bot("code-1", "T0001", "Acme", "xoxb-acme");

    let team = create_team(&app.state, by_name("code-1", "pong"))
        .await
        .expect("install should succeed");

    assert_eq!(team.team_id, "T0001");
    assert_eq!(team.name, "Acme");
    assert_eq!(team.game_id, pong.id);
    assert_eq!(team.aliases, vec!["pp".to_string(), "pongbot".to_string()]);
    assert!(team.active);

    let calls = app.slack.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].client_id, "pong-client-id");
    assert_eq!(calls[0].code, "code-1");

    assert_eq!(app.bots.started(), vec![team.as_bot()]);
    assert_eq!(app.store.writes(), 1);
}

#[tokio::test]
async fn test_reinstall_of_active_team_is_rejected() {
    let app = MemoryApp::new();
    app.add_game("pong", &[]);
    app.slack.grant_bot("code-1", "T0001", "Acme", "xoxb-acme");
    app.slack.grant_bot("code-2", "T0001", "Acme", "xoxb-acme");

    create_team(&app.state, by_name("code-1", "pong"))
        .await
        .unwrap();
    let err = create_team(&app.state, by_name("code-2", "pong"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AlreadyRegistered(_)));
    assert_eq!(err.error_code(), "ALREADY_REGISTERED");
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(app.store.writes(), 1);
    assert_eq!(app.bots.started().len(), 1);
}

#[tokio::test]
async fn test_reinstall_after_deactivation_reactivates() {
    let app = MemoryApp::new();
    let pong = app.add_game("pong", &[]);
    let dormant = app.add_api_team(&pong, "T0001", false);
    // New token for the same workspace, matched by (team_id, game)
    app.slack.grant_bot("code-1", "T0001", "Acme", "xoxb-rotated");

    let team = create_team(&app.state, by_name("code-1", "pong"))
        .await
        .unwrap();

    assert_eq!(team.id, dormant.id);
    assert!(team.active);
    assert!(team.api);

    let started = app.bots.started();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].id, dormant.id);

    // Reactivated team stays visible through the API
    assert_eq!(get_team(&app.state, dormant.id).await.unwrap().id, dormant.id);
}

#[tokio::test]
async fn test_install_into_other_game_is_rejected() {
    let app = MemoryApp::new();
    let pong = app.add_game("pong", &[]);
    app.add_game("chess", &[]);
    let dormant = app.add_api_team(&pong, "T0001", false);
    app.slack
        .grant_bot("code-1", "T0001", "Acme", &dormant.token);

    let err = create_team(&app.state, by_name("code-1", "chess"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidGame(_)));
    assert_eq!(err.error_code(), "INVALID_GAME");
    let unchanged = app
        .state
        .repos
        .teams
        .find(dormant.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, dormant);
    assert!(app.bots.started().is_empty());
}

#[tokio::test]
async fn test_unknown_game_fails_before_exchange() {
    let app = MemoryApp::new();
    app.slack.grant_bot("code-1", "T0001", "Acme", "xoxb-acme");

    let err = create_team(&app.state, by_name("code-1", "checkers"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GameNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(app.slack.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_code_surfaces_as_external_failure() {
    let app = MemoryApp::new();
    app.add_game("pong", &[]);

    let err = create_team(&app.state, by_name("expired", "pong"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ExternalService(_)));
    assert!(err.to_string().contains("invalid_code"));
    assert_eq!(app.slack.calls().len(), 1);
    assert_eq!(app.store.writes(), 0);
}

#[tokio::test]
async fn test_failed_bot_start_keeps_registration() {
    let app = MemoryApp::new();
    app.add_game("pong", &[]);
    app.slack.grant_bot("code-1", "T0001", "Acme", "xoxb-acme");
    app.bots.fail_with("runtime unavailable");

    let err = create_team(&app.state, by_name("code-1", "pong"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ExternalService(_)));
    let stored = app.store.teams().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].active);
}

#[tokio::test]
async fn test_parallel_installs_create_one_team() {
    let app = MemoryApp::new();
    app.add_game("pong", &[]);
    for code in ["code-a", "code-b", "code-c", "code-d"] {
        app.slack.grant_bot(code, "T0001", "Acme", "xoxb-acme");
    }

    let mut handles = Vec::new();
    for code in ["code-a", "code-b", "code-c", "code-d"] {
        let state = app.state.clone();
        handles.push(tokio::spawn(async move {
            create_team(&state, by_name(code, "pong")).await
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(Error::AlreadyRegistered(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, 3);
    assert_eq!(app.store.teams().unwrap().len(), 1);
    assert_eq!(app.bots.started().len(), 1);
}
