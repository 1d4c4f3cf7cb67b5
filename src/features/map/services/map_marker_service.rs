use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::map::dtos::{CreateMapMarkerDto, CreateMarkerResult};
use crate::features::map::models::MapMarker;
use crate::features::map::services::MarkerStore;
use crate::shared::constants::{LOAD_FAILED_MESSAGE, SAVE_FAILED_MESSAGE};
use crate::shared::types::ActionResult;

/// Cached marker list with fetch time
struct MarkerListCache {
    markers: Arc<Vec<MapMarker>>,
    fetched_at: Instant,
}

/// Reads and writes saved markers; the only owner of `map_markers` rows.
///
/// `list_all` is served from a time-limited cache that `create` drops
/// right after a successful insert, so the next read sees the new row.
/// A read that started before an invalidation never refills the cache.
pub struct MapMarkerService {
    store: Arc<dyn MarkerStore>,
    cache: RwLock<Option<MarkerListCache>>,
    cache_ttl: Duration,
    /// Bumped on every invalidation
    cache_generation: AtomicU64,
}

impl MapMarkerService {
    pub fn new(store: Arc<dyn MarkerStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
            cache_ttl,
            cache_generation: AtomicU64::new(0),
        }
    }

    /// Full marker list for the map page.
    ///
    /// Store failures propagate; the page has nothing to show without them.
    pub async fn list_all(&self) -> Result<Arc<Vec<MapMarker>>> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.fetched_at.elapsed() < self.cache_ttl {
                    tracing::debug!(
                        "Serving {} markers from cache (age {}s)",
                        cached.markers.len(),
                        cached.fetched_at.elapsed().as_secs()
                    );
                    return Ok(Arc::clone(&cached.markers));
                }
            }
        }

        let generation = self.cache_generation.load(Ordering::SeqCst);
        let markers = self.store.list_all().await.map_err(|e| {
            tracing::error!("{}: {}", LOAD_FAILED_MESSAGE, e);
            e
        })?;
        let markers = Arc::new(markers);

        tracing::info!("Fetched {} markers", markers.len());

        let mut cache = self.cache.write().await;
        if self.cache_generation.load(Ordering::SeqCst) == generation {
            *cache = Some(MarkerListCache {
                markers: Arc::clone(&markers),
                fetched_at: Instant::now(),
            });
        } else {
            tracing::debug!("Marker list changed during read, not caching");
        }

        Ok(markers)
    }

    /// Save a location from the form.
    ///
    /// Never fails outright: validation and storage problems come back as
    /// `success: false` so the form stays open with a message.
    pub async fn create(&self, dto: CreateMapMarkerDto) -> CreateMarkerResult {
        match self.create_marker(dto).await {
            Ok(marker) => ActionResult::ok(marker.into()),
            Err(e) => Self::failure_result(&e),
        }
    }

    /// Validate and insert, keeping the error for callers that map it to a status
    pub async fn create_marker(&self, dto: CreateMapMarkerDto) -> Result<MapMarker> {
        let new_marker = dto.into_new_marker()?;
        let marker = self.store.insert(new_marker).await?;

        tracing::info!("Marker created: id={}, name={:?}", marker.id, marker.name);

        self.invalidate().await;
        Ok(marker)
    }

    /// Form-facing failure for a create error; storage details stay in the log
    pub fn failure_result(error: &AppError) -> CreateMarkerResult {
        match error {
            AppError::Validation(msg) => ActionResult::failure(msg.clone()),
            e => {
                tracing::error!("Failed to create marker: {}", e);
                ActionResult::failure(SAVE_FAILED_MESSAGE)
            }
        }
    }

    /// Drop the cached list so the next read goes to the store
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        self.cache_generation.fetch_add(1, Ordering::SeqCst);
        if cache.take().is_some() {
            tracing::debug!("Marker list cache invalidated");
        }
    }
}
