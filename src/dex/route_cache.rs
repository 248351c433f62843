use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::types::{Route, RouteRequest};

struct CachedRoutes {
    routes: Vec<Route>,
    fetched_at: DateTime<Utc>,
}

/// Short-lived quote cache for the routing client. Requests with
/// `force_fetch` neither read from nor write to it.
pub struct RouteCache {
    entries: HashMap<String, CachedRoutes>,
    cache_duration_seconds: u64,
}

impl RouteCache {
    pub fn new(cache_duration_seconds: u64) -> Self {
        Self {
            entries: HashMap::new(),
            cache_duration_seconds,
        }
    }

    pub fn insert(&mut self, request: &RouteRequest, routes: Vec<Route>) {
        self.insert_at(request, routes, Utc::now());
    }

    fn insert_at(
        &mut self,
        request: &RouteRequest,
        routes: Vec<Route>,
        fetched_at: DateTime<Utc>,
    ) {
        if request.force_fetch {
            return;
        }

        self.entries
            .insert(request.cache_key(), CachedRoutes { routes, fetched_at });
    }

    pub fn get(&self, request: &RouteRequest) -> Option<Vec<Route>> {
        if request.force_fetch {
            return None;
        }

        let cached = self.entries.get(&request.cache_key())?;
        let cache_age = Utc::now().signed_duration_since(cached.fetched_at);

        if cache_age.num_seconds() < self.cache_duration_seconds as i64 {
            debug!("Serving {} cached routes", cached.routes.len());
            Some(cached.routes.clone())
        } else {
            None
        }
    }

    /// Drops expired entries.
    pub fn prune(&mut self) {
        let now = Utc::now();
        let max_age = self.cache_duration_seconds as i64;
        self.entries.retain(|_, cached| {
            now.signed_duration_since(cached.fetched_at).num_seconds() < max_age
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
