use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::{NewProperty, Property, PropertyOccupancy};
use crate::error::AppError;

pub struct PropertyRepository;

impl PropertyRepository {
    pub async fn create(
        pool: &SqlitePool,
        owner_id: i64,
        data: &NewProperty,
        now: DateTime<Utc>,
    ) -> Result<Property, AppError> {
        let property = sqlx::query_as::<_, Property>(
            "INSERT INTO properties (owner_id, name, address, property_type, total_units, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(owner_id)
        .bind(&data.property_name)
        .bind(&data.address)
        .bind(&data.property_type)
        .bind(data.units.unwrap_or(1))
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(property)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(property)
    }

    /// Owner's properties with active-tenancy occupancy counts.
    pub async fn list_by_owner_email(
        pool: &SqlitePool,
        owner_email: &str,
    ) -> Result<Vec<PropertyOccupancy>, AppError> {
        let properties = sqlx::query_as::<_, PropertyOccupancy>(
            "SELECT p.id, p.owner_id, p.name, p.address, p.property_type, p.total_units,
                    COUNT(DISTINCT t.id) AS occupied_units,
                    p.total_units - COUNT(DISTINCT t.id) AS available_units,
                    p.created_at
             FROM properties p
             JOIN users u ON p.owner_id = u.id
             LEFT JOIN tenancies t ON t.property_id = p.id AND t.status = 'active'
             WHERE u.email = ?
             GROUP BY p.id
             ORDER BY p.created_at DESC",
        )
        .bind(owner_email.to_lowercase())
        .fetch_all(pool)
        .await?;

        Ok(properties)
    }
}
