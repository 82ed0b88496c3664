use crate::domain::models::guest::Guest;
use crate::domain::ports::GuestRepository;
use crate::domain::services::rsvp::RsvpUpdate;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub struct SqliteGuestRepo {
    pool: SqlitePool,
}

impl SqliteGuestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Releases a held seat. Clamped at zero so a double release can never drive
/// the counter negative.
async fn release(
    tx: &mut Transaction<'_, Sqlite>,
    activity: &str,
    slot: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE workshop_capacity SET booked_count = booked_count - 1
         WHERE activity = ? AND slot = ? AND booked_count > 0",
    )
    .bind(activity)
    .bind(slot)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;
    Ok(())
}

/// The authoritative capacity check: a single conditional increment. A zero
/// affected-row count on an existing slot means the slot is full.
async fn try_reserve(
    tx: &mut Transaction<'_, Sqlite>,
    activity: &str,
    slot: &str,
) -> Result<(), AppError> {
    let known: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM workshop_capacity WHERE activity = ? AND slot = ?",
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
         WHERE activity = ? AND slot = ? AND booked_count < capacity_limit",
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
impl GuestRepository for SqliteGuestRepo {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "INSERT INTO guests (id, token, name, company, email, invite_type, category, rsvp_status,
                                 dinner, cocktail, dietary_flag, workshop_activity, workshop_slot,
                                 checked_in, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = ?")
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

        // Touch-write first: takes the write lock on the guest row so
        // concurrent submissions for the same token serialize, and doubles
        // as the existence check.
        let touched = sqlx::query("UPDATE guests SET updated_at = ? WHERE token = ?")
            .bind(now)
            .bind(token)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if touched.rows_affected() == 0 {
            return Err(AppError::NotFound("Invalid token".into()));
        }

        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE token = ?")
            .bind(token)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        // Identical choice is a capacity no-op; a changed choice is a swap:
        // release the old seat and reserve the new one in this same
        // transaction. A WorkshopFull error rolls everything back, old seat
        // included.
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
             SET name = COALESCE(?, name),
                 company = COALESCE(?, company),
                 rsvp_status = ?,
                 dinner = ?,
                 cocktail = ?,
                 dietary_flag = ?,
                 workshop_activity = ?,
                 workshop_slot = ?,
                 updated_at = ?
             WHERE token = ?
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
