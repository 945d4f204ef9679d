use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::dashboard::{Action, Dashboard, ViewState};
use crate::error::{PredictorError, Result};

pub const MAX_PAGES: usize = 256;
pub const PAGE_TTL: Duration = Duration::from_secs(30 * 60);

/// A page's view state tagged with its id and the last action applied to it.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PageView {
    pub page_id: Uuid,
    pub seq: u64,
    #[serde(flatten)]
    pub view: ViewState,
}

struct Page {
    dashboard: Dashboard,
    last_seq: u64,
    last_seen: Instant,
}

/// One view-model per open page. Pages idle longer than the TTL are dropped,
/// and the least recently used page makes room once the cap is reached.
pub struct PageRegistry {
    pages: HashMap<Uuid, Page>,
    capacity: usize,
    ttl: Duration,
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new(MAX_PAGES, PAGE_TTL)
    }
}

impl PageRegistry {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            pages: HashMap::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, page_id: &Uuid) -> bool {
        self.pages.contains_key(page_id)
    }

    pub fn open(&mut self, now: Instant) -> PageView {
        self.evict_expired(now);
        while self.pages.len() >= self.capacity {
            let oldest = self
                .pages
                .iter()
                .min_by_key(|(_, page)| page.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    tracing::debug!("Evicting least recently used page {}", id);
                    self.pages.remove(&id);
                }
                None => break,
            }
        }

        let page_id = Uuid::new_v4();
        let mut dashboard = Dashboard::new();
        let view = dashboard.render();
        self.pages.insert(
            page_id,
            Page {
                dashboard,
                last_seq: 0,
                last_seen: now,
            },
        );
        tracing::info!("📄 Opened page {} ({} open)", page_id, self.pages.len());

        PageView { page_id, seq: 0, view }
    }

    pub fn view(&mut self, page_id: Uuid, now: Instant) -> Result<PageView> {
        let page = self.live_page(page_id, now)?;
        Ok(PageView {
            page_id,
            seq: page.last_seq,
            view: page.dashboard.render(),
        })
    }

    /// Applies one action to one page. A sequence number at or below the last
    /// one applied is refused so a late request cannot undo a newer edit.
    pub fn dispatch(
        &mut self,
        page_id: Uuid,
        seq: Option<u64>,
        action: Action,
        now: Instant,
    ) -> Result<PageView> {
        let page = self.live_page(page_id, now)?;

        let seq = match seq {
            Some(seq) if seq <= page.last_seq => {
                return Err(PredictorError::StaleAction {
                    seq,
                    last_seq: page.last_seq,
                });
            }
            Some(seq) => seq,
            None => page.last_seq + 1,
        };

        let view = page.dashboard.on_user_action(action);
        page.last_seq = seq;

        Ok(PageView { page_id, seq, view })
    }

    fn live_page(&mut self, page_id: Uuid, now: Instant) -> Result<&mut Page> {
        self.evict_expired(now);
        let page = self
            .pages
            .get_mut(&page_id)
            .ok_or(PredictorError::PageNotFound { page_id })?;
        page.last_seen = now;
        Ok(page)
    }

    fn evict_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.pages
            .retain(|_, page| now.saturating_duration_since(page.last_seen) < ttl);
    }
}
