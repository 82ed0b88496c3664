use crate::domain::models::guest::Guest;
use crate::domain::ports::GuestRepository;
use crate::domain::services::rsvp::RsvpUpdate;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresGuestRepo {
    pool: PgPool,
}

impl PostgresGuestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn release(
    tx: &mut Transaction<'_, Postgres>,
    activity: &str,
    slot: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE workshop_capacity SET booked_count = booked_count - 1
         WHERE activity = $1 AND slot = $2 AND booked_count > 0",
    )
    .bind(activity)
    .bind(slot)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;
    Ok(())
}

async fn try_reserve(
    tx: &mut Transaction<'_, Postgres>,
    activity: &str,
    slot: &str,
) -> Result<(), AppError> {
    let known: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM workshop_capacity WHERE activity = $1 AND slot = $2",
    )
    .bind(activity)
    .bind(slot)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::Database)?;

    if known == 0 {
        return Err(AppError::Validation(format!(
            "Unknown workshop slot: {} {}",
            activity, slot
        )));
    }

    let result = sqlx::query(
        "UPDATE workshop_capacity SET booked_count = booked_count + 1
         WHERE activity = $1 AND slot = $2 AND booked_count < capacity_limit",
    )
    .bind(activity)
    .bind(slot)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::WorkshopFull {
            activity: activity.to_string(),
            slot: slot.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl GuestRepository for PostgresGuestRepo {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "INSERT INTO guests (id, token, name, company, email, invite_type, category, rsvp_status,
                                 dinner, cocktail, dietary_flag, workshop_activity, workshop_slot,
                                 checked_in, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *",
        )
        .bind(&guest.id)
        .bind(&guest.token)
        .bind(&guest.name)
        .bind(&guest.company)
        .bind(&guest.email)
        .bind(guest.invite_type)
        .bind(guest.category)
        .bind(guest.rsvp_status)
        .bind(guest.dinner)
        .bind(guest.cocktail)
        .bind(guest.dietary_flag)
        .bind(&guest.workshop_activity)
        .bind(&guest.workshop_slot)
        .bind(guest.checked_in)
        .bind(guest.created_at)
        .bind(guest.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn apply_rsvp(&self, token: &str, update: &RsvpUpdate) -> Result<Guest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let now = Utc::now();

        // Row lock so concurrent submissions for the same token serialize.
        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE token = $1 FOR UPDATE")
            .bind(token)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Invalid token".into()))?;

        // Identical choice is a capacity no-op; a changed choice is a swap
        // inside this transaction. WorkshopFull rolls everything back.
        let old_choice = guest.workshop_choice();
        if old_choice != update.workshop_choice {
            if let Some(ref old) = old_choice {
                release(&mut tx, &old.activity, &old.slot).await?;
            }
            if let Some(ref new) = update.workshop_choice {
                try_reserve(&mut tx, &new.activity, &new.slot).await?;
            }
        }

        let (activity, slot) = match &update.workshop_choice {
            Some(c) => (Some(c.activity.as_str()), Some(c.slot.as_str())),
            None => (None, None),
        };

        let updated = sqlx::query_as::<_, Guest>(
            "UPDATE guests
             SET name = COALESCE($1, name),
                 company = COALESCE($2, company),
                 rsvp_status = $3,
                 dinner = $4,
                 cocktail = $5,
                 dietary_flag = $6,
                 workshop_activity = $7,
                 workshop_slot = $8,
                 updated_at = $9
             WHERE token = $10
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.company)
        .bind(update.status)
        .bind(update.dinner)
        .bind(update.cocktail)
        .bind(update.dietary_flag)
        .bind(activity)
        .bind(slot)
        .bind(now)
        .bind(token)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
