//! PostgreSQL Storage
//!
//! Implements the namespace, element and invite repositories on one `PgPool`.
//! Uniqueness and quota checks are enforced by the statements themselves
//! (`ON CONFLICT DO NOTHING`, guarded `UPDATE ... RETURNING`). Updates never
//! insert, so a write racing a delete cannot bring a row back.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{debug, info};

use crate::element::entity::ElementType;
use crate::shared::error::{PlatformError, Result};
use crate::shared::outcome::RenameOutcome;
use crate::{
    Element, ElementPatch, ElementRepository, Invite, InviteRepository, Namespace,
    NamespaceRepository,
};

const NAMESPACE_COLUMNS: &str = "id, token_hash, active, created";
const ELEMENT_COLUMNS: &str = "namespace_id, key, element_type, internal_data, public_data, \
                               views, max_views, valid_from, valid_until, created";
const INVITE_COLUMNS: &str = "code, uses, max_uses, created";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS namespaces (
        id TEXT PRIMARY KEY,
        token_hash TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS elements (
        namespace_id TEXT NOT NULL REFERENCES namespaces(id) ON DELETE CASCADE,
        key TEXT NOT NULL,
        element_type SMALLINT NOT NULL,
        internal_data TEXT NOT NULL DEFAULT '{}',
        public_data TEXT NOT NULL DEFAULT '{}',
        views BIGINT NOT NULL DEFAULT 0,
        max_views BIGINT NOT NULL DEFAULT -1,
        valid_from BIGINT NOT NULL DEFAULT -1,
        valid_until BIGINT NOT NULL DEFAULT -1,
        created BIGINT NOT NULL,
        PRIMARY KEY (namespace_id, key)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_elements_created ON elements(created)",
    r#"
    CREATE TABLE IF NOT EXISTS invites (
        code TEXT PRIMARY KEY,
        uses INTEGER NOT NULL DEFAULT 0,
        max_uses INTEGER NOT NULL DEFAULT -1,
        created BIGINT NOT NULL
    )
    "#,
];

/// PostgreSQL implementation of the repository traits
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables and indexes if they are missing.
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }

        info!("Database schema initialized");
        Ok(())
    }

    fn parse_namespace(row: &PgRow) -> Result<Namespace> {
        Ok(Namespace {
            id: row.try_get("id")?,
            token_hash: row.try_get("token_hash")?,
            active: row.try_get("active")?,
            created: row.try_get("created")?,
        })
    }

    fn parse_element(row: &PgRow) -> Result<Element> {
        let internal_data: Map<String, Value> =
            serde_json::from_str(row.try_get::<&str, _>("internal_data")?)?;
        let public_data: Map<String, Value> =
            serde_json::from_str(row.try_get::<&str, _>("public_data")?)?;

        Ok(Element {
            namespace_id: row.try_get("namespace_id")?,
            key: row.try_get("key")?,
            element_type: ElementType::from_code(row.try_get("element_type")?),
            internal_data,
            public_data,
            views: row.try_get("views")?,
            max_views: row.try_get("max_views")?,
            valid_from: row.try_get("valid_from")?,
            valid_until: row.try_get("valid_until")?,
            created: row.try_get("created")?,
        })
    }

    fn parse_invite(row: &PgRow) -> Result<Invite> {
        Ok(Invite {
            code: row.try_get("code")?,
            uses: row.try_get("uses")?,
            max_uses: row.try_get("max_uses")?,
            created: row.try_get("created")?,
        })
    }

    fn parse_elements(rows: &[PgRow]) -> Result<Vec<Element>> {
        rows.iter().map(Self::parse_element).collect()
    }

    async fn insert_element(&self, element: &Element) -> Result<u64> {
        let query = format!(
            "INSERT INTO elements ({ELEMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (namespace_id, key) DO NOTHING"
        );

        let result = sqlx::query(&query)
            .bind(&element.namespace_id)
            .bind(&element.key)
            .bind(element.element_type.code())
            .bind(serde_json::to_string(&element.internal_data)?)
            .bind(serde_json::to_string(&element.public_data)?)
            .bind(element.views)
            .bind(element.max_views)
            .bind(element.valid_from)
            .bind(element.valid_until)
            .bind(element.created)
            .execute(&self.pool)
            .await;

        match result {
            Ok(result) => Ok(result.rows_affected()),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(PlatformError::namespace_not_found(&element.namespace_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_foreign_key_violation())
}

/// Map the result of an `UPDATE ... SET <identity> = new RETURNING` statement.
fn rename_outcome<T>(
    row: std::result::Result<Option<PgRow>, sqlx::Error>,
    parse: fn(&PgRow) -> Result<T>,
) -> Result<RenameOutcome<T>> {
    match row {
        Ok(Some(row)) => Ok(RenameOutcome::Renamed(parse(&row)?)),
        Ok(None) => Ok(RenameOutcome::Missing),
        Err(e) if is_unique_violation(&e) => Ok(RenameOutcome::Taken),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl NamespaceRepository for PostgresStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Namespace>> {
        let query = format!("SELECT {NAMESPACE_COLUMNS} FROM namespaces WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_namespace).transpose()
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Namespace>> {
        let query = format!(
            "SELECT {NAMESPACE_COLUMNS} FROM namespaces ORDER BY created, id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::parse_namespace).collect()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM namespaces")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn insert(&self, namespace: &Namespace) -> Result<bool> {
        let query = format!(
            "INSERT INTO namespaces ({NAMESPACE_COLUMNS}) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(&namespace.id)
            .bind(&namespace.token_hash)
            .bind(namespace.active)
            .bind(namespace.created)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Namespace>> {
        let query = format!(
            "UPDATE namespaces SET active = $2 WHERE id = $1 RETURNING {NAMESPACE_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_namespace).transpose()
    }

    async fn set_token_hash(&self, id: &str, token_hash: &str) -> Result<Option<Namespace>> {
        let query = format!(
            "UPDATE namespaces SET token_hash = $2 WHERE id = $1 RETURNING {NAMESPACE_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_namespace).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM namespaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ElementRepository for PostgresStore {
    async fn find(&self, namespace_id: &str, key: &str) -> Result<Option<Element>> {
        let query =
            format!("SELECT {ELEMENT_COLUMNS} FROM elements WHERE namespace_id = $1 AND key = $2");
        let row = sqlx::query(&query)
            .bind(namespace_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_element).transpose()
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Element>> {
        let query = format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements \
             ORDER BY created, namespace_id, key LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;

        Self::parse_elements(&rows)
    }

    async fn find_in_namespace(
        &self,
        namespace_id: &str,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<Element>> {
        let query = format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements WHERE namespace_id = $1 \
             ORDER BY created, key LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(namespace_id)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;

        Self::parse_elements(&rows)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM elements")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn count_in_namespace(&self, namespace_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM elements WHERE namespace_id = $1")
            .bind(namespace_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn insert(&self, element: &Element) -> Result<bool> {
        Ok(self.insert_element(element).await? == 1)
    }

    async fn update_limits(
        &self,
        namespace_id: &str,
        key: &str,
        patch: &ElementPatch,
    ) -> Result<Option<Element>> {
        let query = format!(
            "UPDATE elements SET max_views = COALESCE($3, max_views), \
             valid_from = COALESCE($4, valid_from), \
             valid_until = COALESCE($5, valid_until) \
             WHERE namespace_id = $1 AND key = $2 \
             RETURNING {ELEMENT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(namespace_id)
            .bind(key)
            .bind(patch.max_views)
            .bind(patch.valid_from)
            .bind(patch.valid_until)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_element).transpose()
    }

    async fn rename(
        &self,
        namespace_id: &str,
        key: &str,
        new_key: &str,
    ) -> Result<RenameOutcome<Element>> {
        let query = format!(
            "UPDATE elements SET key = $3 WHERE namespace_id = $1 AND key = $2 \
             RETURNING {ELEMENT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(namespace_id)
            .bind(key)
            .bind(new_key)
            .fetch_optional(&self.pool)
            .await;

        rename_outcome(row, Self::parse_element)
    }

    async fn record_view(&self, namespace_id: &str, key: &str) -> Result<Option<Element>> {
        let query = format!(
            "UPDATE elements SET views = views + 1 \
             WHERE namespace_id = $1 AND key = $2 AND (max_views = -1 OR views < max_views) \
             RETURNING {ELEMENT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(namespace_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_element).transpose()
    }

    async fn delete(&self, namespace_id: &str, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM elements WHERE namespace_id = $1 AND key = $2")
            .bind(namespace_id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_in_namespace(&self, namespace_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM elements WHERE namespace_id = $1")
            .bind(namespace_id)
            .execute(&self.pool)
            .await?;

        debug!(
            namespace = %namespace_id,
            count = result.rows_affected(),
            "Deleted namespace elements"
        );
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl InviteRepository for PostgresStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Invite>> {
        let query = format!("SELECT {INVITE_COLUMNS} FROM invites WHERE code = $1");
        let row = sqlx::query(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_invite).transpose()
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Invite>> {
        let query = format!(
            "SELECT {INVITE_COLUMNS} FROM invites ORDER BY created, code LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::parse_invite).collect()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invites")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn insert(&self, invite: &Invite) -> Result<bool> {
        let query = format!(
            "INSERT INTO invites ({INVITE_COLUMNS}) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (code) DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(&invite.code)
            .bind(invite.uses)
            .bind(invite.max_uses)
            .bind(invite.created)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_max_uses(&self, code: &str, max_uses: i32) -> Result<Option<Invite>> {
        let query = format!(
            "UPDATE invites SET max_uses = $2 WHERE code = $1 RETURNING {INVITE_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(code)
            .bind(max_uses)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_invite).transpose()
    }

    async fn rename(&self, code: &str, new_code: &str) -> Result<RenameOutcome<Invite>> {
        let query =
            format!("UPDATE invites SET code = $2 WHERE code = $1 RETURNING {INVITE_COLUMNS}");
        let row = sqlx::query(&query)
            .bind(code)
            .bind(new_code)
            .fetch_optional(&self.pool)
            .await;

        rename_outcome(row, Self::parse_invite)
    }

    async fn redeem(&self, code: &str) -> Result<Option<Invite>> {
        let query = format!(
            "UPDATE invites SET uses = uses + 1 \
             WHERE code = $1 AND (max_uses = -1 OR uses < max_uses) \
             RETURNING {INVITE_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_invite).transpose()
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invites WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
