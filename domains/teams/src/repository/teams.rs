//! Team repository

use crate::domain::entities::{Team, TeamSortField};
use crate::domain::filter::TeamFilter;
use crate::repository::TeamStore;
use gamebot_common::{CursorValue, RepositoryError, Result, SortDirection, Window};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const SELECT_TEAMS: &str = r#"
    SELECT id, team_id, name, token, game_id, aliases, active, api, created_at, updated_at
    FROM teams WHERE TRUE"#;

#[derive(Clone)]
pub struct PgTeamStore {
    pool: PgPool,
}

impl PgTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the filter's predicates to a query ending in a `WHERE` clause
fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &TeamFilter) {
    if filter.api_only {
        query.push(" AND api = TRUE");
    }
    if filter.active_only {
        query.push(" AND active = TRUE");
    }
    if let Some(game_id) = filter.game_id {
        query.push(" AND game_id = ").push_bind(game_id);
    }
}

fn push_value(query: &mut QueryBuilder<'_, Postgres>, value: &CursorValue) {
    match value {
        CursorValue::Int(v) => query.push_bind(*v),
        CursorValue::Text(v) => query.push_bind(v.clone()),
        CursorValue::Timestamp(v) => query.push_bind(*v),
        CursorValue::Uuid(v) => query.push_bind(*v),
    };
}

/// Build the keyset scan for a window:
/// `.. AND (<field>, id) > (<value>, <tie>) ORDER BY <field>, id LIMIT n + 1`
pub(crate) fn scan_query<'a>(
    filter: &TeamFilter,
    window: &Window<TeamSortField>,
) -> QueryBuilder<'a, Postgres> {
    let column = window.directive.field.column();
    let direction = window.scan_direction();

    let mut query = QueryBuilder::new(SELECT_TEAMS);
    push_filter(&mut query, filter);

    if let Some(after) = &window.after {
        let op = match direction {
            SortDirection::Asc => ">",
            SortDirection::Desc => "<",
        };
        query.push(format!(" AND ({}, id) {} (", column, op));
        push_value(&mut query, &after.value);
        query.push(", ");
        push_value(&mut query, &after.tie);
        query.push(")");
    }

    let order = direction.as_sql();
    query.push(format!(
        " ORDER BY {} {}, id {} LIMIT ",
        column, order, order
    ));
    query.push_bind(window.fetch_limit() as i64);
    query
}

#[async_trait::async_trait]
impl TeamStore for PgTeamStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<Team>> {
        let row = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_id, name, token, game_id, aliases, active, api, created_at, updated_at
            FROM teams WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn find_by_token(&self, token: &str) -> Result<Option<Team>> {
        let row = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_id, name, token, game_id, aliases, active, api, created_at, updated_at
            FROM teams WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_team_id_and_game(
        &self,
        team_id: &str,
        game_id: Uuid,
    ) -> Result<Option<Team>> {
        // An active row wins over historical inactive ones
        let row = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_id, name, token, game_id, aliases, active, api, created_at, updated_at
            FROM teams WHERE team_id = $1 AND game_id = $2
            ORDER BY active DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(team_id)
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(level = "debug", skip(self, window), fields(sort = %window.directive.key()))]
    async fn scan(
        &self,
        filter: &TeamFilter,
        window: &Window<TeamSortField>,
    ) -> Result<Vec<Team>> {
        let rows = scan_query(filter, window)
            .build_query_as::<Team>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn count(&self, filter: &TeamFilter) -> Result<u64> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM teams WHERE TRUE");
        push_filter(&mut query, filter);
        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(team_id = %team.team_id))]
    async fn create(&self, team: &Team) -> std::result::Result<Team, RepositoryError> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (id, team_id, name, token, game_id, aliases, active, api,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, team_id, name, token, game_id, aliases, active, api,
                      created_at, updated_at
            "#,
        )
        .bind(team.id)
        .bind(&team.team_id)
        .bind(&team.name)
        .bind(&team.token)
        .bind(team.game_id)
        .bind(&team.aliases)
        .bind(team.active)
        .bind(team.api)
        .bind(team.created_at)
        .bind(team.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn activate(&self, id: Uuid) -> std::result::Result<Option<Team>, RepositoryError> {
        sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET active = TRUE, updated_at = NOW()
            WHERE id = $1 AND active = FALSE
            RETURNING id, team_id, name, token, game_id, aliases, active, api,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }
}
