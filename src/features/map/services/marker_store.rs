use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::map::models::{MapMarker, NewMapMarker};

/// Storage port for map markers
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Every marker, newest event first, undated markers last
    async fn list_all(&self) -> Result<Vec<MapMarker>>;

    /// Insert one row and return it with its generated `id` and `created_at`
    async fn insert(&self, marker: NewMapMarker) -> Result<MapMarker>;
}

/// Postgres-backed marker store
pub struct PgMarkerStore {
    pool: PgPool,
}

impl PgMarkerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarkerStore for PgMarkerStore {
    async fn list_all(&self) -> Result<Vec<MapMarker>> {
        sqlx::query_as::<_, MapMarker>(
            r#"
            SELECT id, name, address, lat, lng, description, event_date, created_at
            FROM map_markers
            ORDER BY event_date DESC NULLS LAST, created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list map markers: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, marker: NewMapMarker) -> Result<MapMarker> {
        sqlx::query_as::<_, MapMarker>(
            r#"
            INSERT INTO map_markers (name, lat, lng, address, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, lat, lng, description, event_date, created_at
            "#,
        )
        .bind(&marker.name)
        .bind(marker.lat)
        .bind(marker.lng)
        .bind(&marker.address)
        .bind(&marker.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert map marker: {:?}", e);
            AppError::Database(e)
        })
    }
}
