use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;

use crate::models::user::RegistrationRequest;
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool),
    fields(
        username = %user_form.username,
        email = %user_form
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>
) -> HttpResponse {
    let password_hash = match hash_password(user_form.password.expose_secret()) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    match insert_user(&user_form, &password_hash, &pool).await
    {
        Ok(_) => HttpResponse::Ok().finish(),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::info!("Username or email already taken");
            HttpResponse::Conflict().finish()
        }
        Err(_) => HttpResponse::InternalServerError().finish()
    }
}

/// Inserts the user together with an empty prediction for every match, so
/// each (user, match) pair has exactly one prediction to edit.
pub async fn insert_user(
    user_form: &RegistrationRequest,
    password_hash: &str,
    pool: &PgPool
) -> Result<Uuid, sqlx::Error> {
    let user_id = Uuid::new_v4();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash, email, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(&user_form.username)
    .bind(password_hash)
    .bind(&user_form.email)
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute user insert query: {:?}", e);
        e
    })?;

    let created = sqlx::query(
        r#"
        INSERT INTO user_matches (user_id, match_id)
        SELECT $1, id FROM matches
        ON CONFLICT (user_id, match_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create predictions for new user: {:?}", e);
        e
    })?;

    tx.commit().await?;

    tracing::info!("Created user {} with {} empty predictions", user_id, created.rows_affected());
    Ok(user_id)
}
