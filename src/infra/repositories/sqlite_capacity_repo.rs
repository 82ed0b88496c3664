use crate::domain::models::checkin::CapacityEntry;
use crate::domain::ports::CapacityRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCapacityRepo {
    pool: SqlitePool,
}

impl SqliteCapacityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CapacityRepository for SqliteCapacityRepo {
    async fn seed(&self, entries: &[CapacityEntry]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for entry in entries {
            // Limits come from config and may be re-applied on restart;
            // booked_count is state and survives the upsert.
            sqlx::query(
                "INSERT INTO workshop_capacity (activity, slot, capacity_limit, booked_count)
                 VALUES (?, ?, ?, 0)
                 ON CONFLICT (activity, slot)
                 DO UPDATE SET capacity_limit = excluded.capacity_limit",
            )
            .bind(&entry.activity)
            .bind(&entry.slot)
            .bind(entry.capacity_limit)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn availability(&self) -> Result<Vec<CapacityEntry>, AppError> {
        sqlx::query_as::<_, CapacityEntry>(
            "SELECT * FROM workshop_capacity ORDER BY activity, slot",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
