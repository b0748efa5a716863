//! PostgreSQL store tests
//!
//! Require a migrated database:
//! `DATABASE_URL=postgres://... cargo test -p gamebot-integration-tests --test postgres_test -- --ignored`

mod common;

use gamebot_common::{Error, RepositoryError, Traversal};
use gamebot_teams::{create_team, list_teams, CreateTeamParams, ListTeamsParams, TeamStore};
use uuid::Uuid;

use crate::common::{team, PgApp};

async fn app() -> PgApp {
    PgApp::connect()
        .await
        .expect("database should be reachable")
        .expect("DATABASE_URL must be set for postgres tests")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unique_constraints_map_to_already_exists() {
    let app = app().await;
    let game = app.add_game("constraints").await.unwrap();
    let store = app.state.repos.teams.clone();
    let token = format!("xoxb-{}", Uuid::new_v4());

    store.create(&team(&game, "T1", &token)).await.unwrap();

    let same_token = store.create(&team(&game, "T2", &token)).await;
    assert!(matches!(same_token, Err(RepositoryError::AlreadyExists)));

    let same_key = store
        .create(&team(&game, "T1", &format!("xoxb-{}", Uuid::new_v4())))
        .await;
    assert!(matches!(same_key, Err(RepositoryError::AlreadyExists)));

    app.cleanup(&game).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_activate_is_compare_and_set() {
    let app = app().await;
    let game = app.add_game("activate").await.unwrap();
    let store = app.state.repos.teams.clone();

    let created = store
        .create(&team(&game, "T1", &format!("xoxb-{}", Uuid::new_v4())))
        .await
        .unwrap();
    app.deactivate(created.id).await.unwrap();

    let activated = store.activate(created.id).await.unwrap().unwrap();
    assert!(activated.active);
    assert_eq!(activated.id, created.id);
    assert_eq!(store.activate(created.id).await.unwrap(), None);

    app.cleanup(&game).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_register_list_and_reactivate() {
    let app = app().await;
    let game = app.add_game("flow").await.unwrap();

    let mut ids = Vec::new();
    for i in 0..5 {
        let code = format!("code-{}", i);
        app.slack.grant_bot(
            &code,
            &format!("T{}", i),
            &format!("Workspace {}", i),
            &format!("xoxb-{}", Uuid::new_v4()),
        );
        let team = create_team(
            &app.state,
            CreateTeamParams {
                code,
                game: None,
                game_id: Some(game.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(team.aliases, game.aliases);
        app.publish(team.id).await.unwrap();
        ids.push(team.id);
    }
    assert_eq!(app.bots.started().len(), 5);

    // Walk the game's teams oldest first, two at a time
    let mut params = ListTeamsParams {
        game_id: Some(game.id),
        sort: Some("id".to_string()),
        ..Default::default()
    };
    params.pagination.size = Some(2);
    params.pagination.total_count = Some(true);

    let mut seen = Vec::new();
    loop {
        let page = list_teams(&app.state, params.clone()).await.unwrap();
        assert_eq!(page.total_count, Some(5));
        seen.extend(page.items.iter().map(|team| team.id));
        match page.next_cursor {
            Some(cursor) => params.pagination.cursor = Some(cursor),
            None => break,
        }
    }
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(seen, expected);

    // And back again from the end
    let mut params = ListTeamsParams {
        game_id: Some(game.id),
        sort: Some("created_at".to_string()),
        ..Default::default()
    };
    params.pagination.size = Some(10);
    params.pagination.direction = Some(Traversal::Backward);
    let page = list_teams(&app.state, params).await.unwrap();
    assert_eq!(page.items.len(), 5);

    // Reinstalling an active team is rejected; after deactivation it comes back
    app.deactivate(ids[0]).await.unwrap();
    let first = app.state.repos.teams.find(ids[0]).await.unwrap().unwrap();
    app.slack.grant_bot("again", &first.team_id, &first.name, &first.token);
    let team = create_team(
        &app.state,
        CreateTeamParams {
            code: "again".to_string(),
            game: Some(game.name.clone()),
            game_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(team.id, ids[0]);
    assert!(team.active);

    app.slack.grant_bot("once-more", &first.team_id, &first.name, &first.token);
    let err = create_team(
        &app.state,
        CreateTeamParams {
            code: "once-more".to_string(),
            game: Some(game.name.clone()),
            game_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::AlreadyRegistered(_)));

    app.cleanup(&game).await.unwrap();
}
