//! Layout sessions: live preview state for one editor.
//!
//! Each session owns a pass tracker, a scoped image URL cache and the last
//! committed layout. Every change in the editor triggers a pass; a pass that
//! finishes after a newer one started is discarded instead of committed.
//!
//! Sessions idle for longer than the registry's TTL are purged, both by a
//! periodic sweep and when a create call finds the registry full.

pub mod handlers;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{run_layout_pass, LayoutResult, MeasurementSurface, PassTracker};
use crate::models::cv::CvData;
use crate::models::params::TemplateParams;
use crate::templates::images::ImageUrlCache;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CommittedLayout {
    pub generation: u64,
    pub committed_at: DateTime<Utc>,
    pub layout: LayoutResult,
}

/// What happened to a triggered pass.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    Committed { generation: u64, layout: LayoutResult },
    /// A newer pass started while this one ran; nothing was committed.
    Superseded { generation: u64 },
}

pub struct LayoutSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    last_active: Mutex<DateTime<Utc>>,
    tracker: PassTracker,
    images: ImageUrlCache,
    committed: RwLock<Option<CommittedLayout>>,
}

impl LayoutSession {
    fn new(storage_public_url: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: Mutex::new(now),
            tracker: PassTracker::default(),
            images: ImageUrlCache::new(storage_public_url),
            committed: RwLock::new(None),
        }
    }

    /// Runs a pass and commits it if no newer pass was started meanwhile.
    ///
    /// The generation check happens under the commit lock, so an older pass
    /// can never overwrite a newer committed layout.
    pub async fn run_pass(
        &self,
        surface: &dyn MeasurementSurface,
        cv: &CvData,
        params: &TemplateParams,
    ) -> Result<PassOutcome, AppError> {
        self.touch();
        let ticket = self.tracker.begin();
        let layout = run_layout_pass(surface, cv, params, &self.images).await?;

        let mut committed = self.committed.write().await;
        if !self.tracker.is_current(ticket) {
            debug!(
                session_id = %self.id,
                generation = ticket.generation,
                latest = self.tracker.latest(),
                "Discarding superseded layout pass"
            );
            return Ok(PassOutcome::Superseded {
                generation: ticket.generation,
            });
        }

        *committed = Some(CommittedLayout {
            generation: ticket.generation,
            committed_at: Utc::now(),
            layout: layout.clone(),
        });
        Ok(PassOutcome::Committed {
            generation: ticket.generation,
            layout,
        })
    }

    pub async fn committed(&self) -> Option<CommittedLayout> {
        self.committed.read().await.clone()
    }

    #[cfg(test)]
    pub fn cached_images(&self) -> usize {
        self.images.len()
    }

    fn touch(&self) {
        self.touch_at(Utc::now());
    }

    fn touch_at(&self, at: DateTime<Utc>) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let last_active = *self.last_active.lock().unwrap_or_else(PoisonError::into_inner);
        now - last_active >= ttl
    }

    fn teardown(&self) -> usize {
        self.images.evict_all()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// In-memory session map. Cloning shares the same map.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<LayoutSession>>>>,
    storage_public_url: String,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(storage_public_url: impl Into<String>, max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            storage_public_url: storage_public_url.into(),
            max_sessions,
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Creates a session. A full registry first drops its idle sessions and
    /// only then answers with [`AppError::Capacity`].
    pub async fn create(&self) -> Result<Arc<LayoutSession>, AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            self.purge_locked(&mut sessions, Utc::now());
        }
        if sessions.len() >= self.max_sessions {
            return Err(AppError::Capacity(self.max_sessions));
        }
        let session = Arc::new(LayoutSession::new(&self.storage_public_url));
        sessions.insert(session.id, Arc::clone(&session));
        info!(session_id = %session.id, open = sessions.len(), "Layout session created");
        Ok(session)
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<LayoutSession>, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .map(|session| {
                session.touch();
                session
            })
            .ok_or_else(|| AppError::NotFound(format!("Layout session {id} not found")))
    }

    /// Removes the session and evicts its image cache. Passes still running
    /// on it finish against their own handle and are never observable.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Layout session {id} not found")))?;
        let evicted = session.teardown();
        info!(session_id = %id, evicted, "Layout session closed");
        Ok(())
    }

    /// Drops every session idle for at least the TTL. Returns how many went.
    pub async fn purge_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.purge_locked(&mut sessions, Utc::now())
    }

    fn purge_locked(&self, sessions: &mut HashMap<Uuid, Arc<LayoutSession>>, now: DateTime<Utc>) -> usize {
        let idle: Vec<Uuid> = sessions
            .values()
            .filter(|session| session.is_idle(now, self.idle_ttl))
            .map(|session| session.id)
            .collect();
        for id in &idle {
            if let Some(session) = sessions.remove(id) {
                let evicted = session.teardown();
                debug!(session_id = %id, evicted, "Idle layout session expired");
            }
        }
        if !idle.is_empty() {
            info!(expired = idle.len(), open = sessions.len(), "Purged idle layout sessions");
        }
        idle.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measurer::{metric_table_surface, signalled_surface, MetricTableMeasurer};
    use crate::models::cv::PersonalInfo;
    use crate::templates::TemplateId;
    

    fn cv() -> CvData {
        CvData {
            personal: PersonalInfo {
                full_name: "Margaret Hamilton".to_string(),
                email: Some("margaret@example.com".to_string()),
                avatar_path: Some("avatars/margaret.png".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn registry(max_sessions: usize) -> SessionRegistry {
        SessionRegistry::new("https://storage.example", max_sessions, Duration::minutes(30))
    }

    fn sidebar_params() -> TemplateParams {
        TemplateParams {
            template: TemplateId::Sidebar,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pass_commits_latest_layout() {
        let registry = registry(4);
        let session = registry.create().await.expect("session");
        let surface = metric_table_surface();

        let outcome = session
            .run_pass(&surface, &cv(), &TemplateParams::default())
            .await
            .expect("pass");
        assert!(matches!(outcome, PassOutcome::Committed { generation: 1, .. }));

        let outcome = session
            .run_pass(&surface, &cv(), &sidebar_params())
            .await
            .expect("pass");
        assert!(matches!(outcome, PassOutcome::Committed { generation: 2, .. }));

        let committed = session.committed().await.expect("committed");
        assert_eq!(committed.generation, 2);
        assert_eq!(committed.layout.template, TemplateId::Sidebar);
    }

    #[tokio::test]
    async fn test_stale_pass_is_not_committed() {
        let registry = registry(4);
        let session = registry.create().await.expect("session");
        let (surface, handle) = signalled_surface(Arc::new(MetricTableMeasurer));
        let surface = Arc::new(surface);

        // first pass blocks on the unready surface
        let stale = {
            let session = Arc::clone(&session);
            let surface = Arc::clone(&surface);
            tokio::spawn(async move {
                session
                    .run_pass(surface.as_ref(), &cv(), &TemplateParams::default())
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        // second pass starts after the first, then the surface becomes ready
        let fresh = {
            let session = Arc::clone(&session);
            let surface = Arc::clone(&surface);
            tokio::spawn(async move {
                session
                    .run_pass(surface.as_ref(), &cv(), &sidebar_params())
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        handle.mark_ready();

        let stale = stale.await.expect("join").expect("pass");
        let fresh = fresh.await.expect("join").expect("pass");
        assert!(matches!(stale, PassOutcome::Superseded { generation: 1 }));
        assert!(matches!(fresh, PassOutcome::Committed { generation: 2, .. }));

        let committed = session.committed().await.expect("committed");
        assert_eq!(committed.generation, 2);
        assert_eq!(committed.layout.template, TemplateId::Sidebar);
    }

    #[tokio::test]
    async fn test_failed_pass_keeps_previous_layout() {
        let registry = registry(4);
        let session = registry.create().await.expect("session");
        let surface = metric_table_surface();
        session
            .run_pass(&surface, &cv(), &TemplateParams::default())
            .await
            .expect("pass");

        let bad = TemplateParams {
            accent_color: "#12".to_string(),
            ..Default::default()
        };
        assert!(session.run_pass(&surface, &cv(), &bad).await.is_err());
        let committed = session.committed().await.expect("committed");
        assert_eq!(committed.generation, 1);
    }

    #[tokio::test]
    async fn test_teardown_evicts_image_cache() {
        let registry = registry(4);
        let session = registry.create().await.expect("session");
        let surface = metric_table_surface();
        session
            .run_pass(&surface, &cv(), &sidebar_params())
            .await
            .expect("pass");
        assert_eq!(session.cached_images(), 1);

        registry.remove(session.id).await.expect("remove");
        assert_eq!(session.cached_images(), 0);
        assert!(matches!(
            registry.get(session.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            registry.remove(session.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_capacity_is_enforced() {
        let registry = registry(2);
        let first = registry.create().await.expect("session");
        registry.create().await.expect("session");
        assert!(matches!(
            registry.create().await,
            Err(AppError::Capacity(2))
        ));
        registry.remove(first.id).await.expect("remove");
        assert!(registry.create().await.is_ok());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_purge_drops_only_idle_sessions() {
        let registry = registry(4);
        let idle = registry.create().await.expect("session");
        let active = registry.create().await.expect("session");
        idle.touch_at(Utc::now() - Duration::hours(1));

        assert_eq!(registry.purge_idle().await, 1);
        assert!(matches!(registry.get(idle.id).await, Err(AppError::NotFound(_))));
        assert!(registry.get(active.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_full_registry_reclaims_idle_session() {
        let registry = registry(1);
        let abandoned = registry.create().await.expect("session");
        let surface = metric_table_surface();
        abandoned
            .run_pass(&surface, &cv(), &sidebar_params())
            .await
            .expect("pass");
        assert_eq!(abandoned.cached_images(), 1);

        abandoned.touch_at(Utc::now() - Duration::hours(2));
        let fresh = registry.create().await.expect("idle session reclaimed");
        assert_ne!(fresh.id, abandoned.id);
        assert_eq!(abandoned.cached_images(), 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_full_registry_keeps_active_sessions() {
        let registry = registry(1);
        let active = registry.create().await.expect("session");
        assert!(matches!(registry.create().await, Err(AppError::Capacity(1))));
        assert!(registry.get(active.id).await.is_ok());
    }
}
