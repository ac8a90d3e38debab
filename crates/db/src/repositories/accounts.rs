use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{info, warn};
use tutorbook_core::{
    errors::{BookingError, BookingResult},
    models::account::{
        Actor, AdminNotification, Credentials, ProvisionedStudent, Role, Student, User,
    },
    services::Accounts,
};
use uuid::Uuid;

use super::{begin, StoreSettings};
use crate::{
    errors::{classify, is_unique_violation},
    models::{DbAdminNotification, DbStudent, DbUser},
    password::{hash_password, verify_password},
};

const INVALID_CREDENTIALS: &str = "invalid login or password";

/// Contact details a lesson carries before it is linked to an account.
#[derive(Debug, FromRow)]
struct LessonContact {
    student_id: Option<Uuid>,
    student_name: Option<String>,
    student_phone: Option<String>,
}

async fn insert_user(
    conn: &mut PgConnection,
    login: &str,
    password_hash: &str,
    role: Role,
) -> BookingResult<DbUser> {
    sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, username, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, password_hash, role
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(login)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            BookingError::LoginTaken(login.to_string())
        } else {
            classify(err)
        }
    })
}

#[derive(Clone)]
pub struct PgAccounts {
    pool: PgPool,
    settings: StoreSettings,
}

impl PgAccounts {
    pub fn new(pool: PgPool, settings: StoreSettings) -> Self {
        Self { pool, settings }
    }
}

#[async_trait]
impl Accounts for PgAccounts {
    async fn provision_student(
        &self,
        lesson_id: Uuid,
        credentials: Credentials,
    ) -> BookingResult<ProvisionedStudent> {
        let credentials = credentials.validated()?;
        let password_hash = hash_password(&credentials.password)?;

        let mut tx = begin(&self.pool, &self.settings).await?;

        let contact = sqlx::query_as::<_, LessonContact>(
            r#"
            SELECT student_id, student_name, student_phone
            FROM lessons
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(classify)?
        .ok_or_else(|| BookingError::lesson_not_found(lesson_id))?;

        if contact.student_id.is_some() {
            return Err(BookingError::AlreadyProvisioned(lesson_id));
        }

        let full_name = contact
            .student_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                BookingError::Validation(format!("lesson {} has no student name", lesson_id))
            })?;

        let user = insert_user(&mut tx, &credentials.login, &password_hash, Role::Student).await?;

        let student = sqlx::query_as::<_, DbStudent>(
            r#"
            INSERT INTO students (id, user_id, full_name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, full_name, phone
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&full_name)
        .bind(&contact.student_phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

        sqlx::query("UPDATE lessons SET student_id = $2 WHERE id = $1")
            .bind(lesson_id)
            .bind(student.id)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await.map_err(classify)?;

        info!(
            lesson_id = %lesson_id,
            student_id = %student.id,
            login = %user.username,
            "provisioned student account"
        );
        Ok(ProvisionedStudent {
            lesson_id,
            user_id: user.id,
            student_id: student.id,
            login: user.username,
        })
    }

    async fn create_user(&self, credentials: Credentials, role: Role) -> BookingResult<User> {
        let credentials = credentials.validated()?;
        let password_hash = hash_password(&credentials.password)?;

        let mut tx = begin(&self.pool, &self.settings).await?;
        let user = insert_user(&mut tx, &credentials.login, &password_hash, role).await?;
        tx.commit().await.map_err(classify)?;

        info!(user_id = %user.id, role = %role, "created user");
        User::try_from(user)
    }

    async fn authenticate(&self, credentials: Credentials) -> BookingResult<Actor> {
        let credentials = credentials
            .validated()
            .map_err(|_| BookingError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(&credentials.login)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        // Unknown login and wrong password look the same to the caller.
        let Some(user) = user else {
            warn!(login = %credentials.login, "login attempt for unknown user");
            return Err(BookingError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&credentials.password, &user.password_hash)? {
            warn!(login = %credentials.login, "login attempt with wrong password");
            return Err(BookingError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let user = User::try_from(user)?;
        Ok(Actor::new(user.username, user.role))
    }

    async fn student_by_login(&self, login: String) -> BookingResult<Option<Student>> {
        let row = sqlx::query_as::<_, DbStudent>(
            r#"
            SELECT s.id, s.user_id, s.full_name, s.phone
            FROM students s
            JOIN users u ON u.id = s.user_id
            WHERE u.username = $1
            "#,
        )
        .bind(&login)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(Student::from))
    }

    async fn notify_forgotten_password(&self, login: String) -> BookingResult<AdminNotification> {
        let login = login.trim();
        if login.is_empty() {
            return Err(BookingError::Validation("login is required".to_string()));
        }

        let row = sqlx::query_as::<_, DbAdminNotification>(
            r#"
            INSERT INTO admin_notifications (id, message)
            VALUES ($1, $2)
            RETURNING id, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(format!("Password reset requested for login: {}", login))
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        info!(notification_id = %row.id, "recorded password reset request");
        Ok(row.into())
    }

    async fn admin_notifications(&self) -> BookingResult<Vec<AdminNotification>> {
        let rows = sqlx::query_as::<_, DbAdminNotification>(
            r#"
            SELECT id, message, created_at
            FROM admin_notifications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(AdminNotification::from).collect())
    }
}
