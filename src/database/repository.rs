use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewNote, Note, NotePatch, Role, User};

/// Data access for notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes in id order.
    async fn find_all(&self) -> Result<Vec<Note>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Note>, DatabaseError>;

    /// Insert and return the stored row with its generated id.
    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError>;

    /// Applies `patch` to the stored row atomically. `None` if there is no such note.
    async fn update(&self, patch: NotePatch) -> Result<Option<Note>, DatabaseError>;

    /// Returns false if there was nothing to delete.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

/// Data access for users and their roles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up a login name, roles included.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError>;

    /// Creates a user without roles. `password_hash` must already be hashed.
    async fn create_user(&self, name: &str, password_hash: &str) -> Result<User, DatabaseError>;

    /// Returns the named role, creating it on first use.
    async fn ensure_role(&self, name: &str) -> Result<Role, DatabaseError>;

    /// Idempotent.
    async fn assign_role(&self, user_id: i64, role_id: i32) -> Result<(), DatabaseError>;

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
}

pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn find_all(&self) -> Result<Vec<Note>, DatabaseError> {
        let notes = sqlx::query_as::<_, Note>("SELECT id, title, content FROM note ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Note>, DatabaseError> {
        let note = sqlx::query_as::<_, Note>("SELECT id, title, content FROM note WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(note)
    }

    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let stored = sqlx::query_as::<_, Note>(
            "INSERT INTO note (title, content) VALUES ($1, $2) RETURNING id, title, content",
        )
        .bind(note.title)
        .bind(note.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn update(&self, patch: NotePatch) -> Result<Option<Note>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Row lock keeps concurrent partial edits from overwriting each other's fields
        let existing = sqlx::query_as::<_, Note>(
            "SELECT id, title, content FROM note WHERE id = $1 FOR UPDATE",
        )
        .bind(patch.id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back
        let Some(mut note) = existing else {
            return Ok(None);
        };
        note.apply(patch);

        sqlx::query("UPDATE note SET title = $2, content = $3 WHERE id = $1")
            .bind(note.id)
            .bind(&note.title)
            .bind(&note.content)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(note))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_WITH_ROLES: &str = r#"
    SELECT u.id, u.name, u.password, r.id AS role_id, r.name AS role_name
    FROM userinfo u
    LEFT JOIN user_role ur ON ur.user_id = u.id
    LEFT JOIN role r ON r.id = ur.role_id
"#;

/// Folds joined user/role rows (ordered by user id) into users.
fn assemble_users(rows: Vec<PgRow>) -> Result<Vec<User>, sqlx::Error> {
    let mut users: Vec<User> = Vec::new();

    for row in rows {
        let id: i64 = row.try_get("id")?;
        if users.last().map(|u| u.id) != Some(id) {
            users.push(User {
                id,
                name: row.try_get("name")?,
                password: row.try_get("password")?,
                roles: Vec::new(),
            });
        }

        let role_id: Option<i32> = row.try_get("role_id")?;
        let role_name: Option<String> = row.try_get("role_name")?;
        if let (Some(role_id), Some(role_name), Some(user)) = (role_id, role_name, users.last_mut()) {
            user.roles.push(Role { id: role_id, name: role_name });
        }
    }

    Ok(users)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("{} WHERE u.name = $1 ORDER BY u.id, r.id", USER_WITH_ROLES);
        let rows = sqlx::query(&query).bind(name).fetch_all(&self.pool).await?;
        Ok(assemble_users(rows)?.into_iter().next())
    }

    async fn create_user(&self, name: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let row = sqlx::query("INSERT INTO userinfo (name, password) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(User {
            id: row.try_get("id")?,
            name: name.to_string(),
            password: password_hash.to_string(),
            roles: Vec::new(),
        })
    }

    async fn ensure_role(&self, name: &str) -> Result<Role, DatabaseError> {
        // DO UPDATE so RETURNING yields the row on conflict as well
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO role (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(role)
    }

    async fn assign_role(&self, user_id: i64, role_id: i32) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO user_role (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let query = format!("{} ORDER BY u.id, r.id", USER_WITH_ROLES);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(assemble_users(rows)?)
    }
}
