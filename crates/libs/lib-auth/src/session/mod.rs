//! # Login Sessions
//!
//! Server-side session records. Clients only ever hold the opaque [`Session::id`].

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A server-side login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for `user_id` valid for `ttl_hours`.
    pub fn open(user_id: i64, ttl_hours: i64) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: Utc::now() + Duration::hours(ttl_hours),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
