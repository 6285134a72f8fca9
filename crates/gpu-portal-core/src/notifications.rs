//! Notification store with read/unread state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Number of notifications shown in the top-bar dropdown.
pub const PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Read-state view over the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl ReadFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadFilter::All => "all",
            ReadFilter::Unread => "unread",
            ReadFilter::Read => "read",
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            ReadFilter::All => true,
            ReadFilter::Unread => !notification.read,
            ReadFilter::Read => notification.read,
        }
    }
}

impl FromStr for ReadFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ReadFilter::All),
            "unread" => Ok(ReadFilter::Unread),
            "read" => Ok(ReadFilter::Read),
            other => Err(format!("unknown read filter '{}'", other)),
        }
    }
}

/// In-memory notification list. Order is preserved as loaded (newest first
/// for the canned data).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
}

impl NotificationStore {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self { notifications }
    }

    /// Replace the whole list (initial fetch).
    pub fn load(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Mark one notification read. Returns `false` when the id is unknown.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        debug!(count = self.notifications.len(), "marked all notifications read");
    }

    /// Remove one notification. Returns `false` when the id is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    pub fn clear_all(&mut self) {
        self.notifications.clear();
    }

    pub fn filter(&self, filter: ReadFilter) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| filter.matches(n))
            .collect()
    }

    /// The first `limit` notifications, for the dropdown preview.
    pub fn preview(&self, limit: usize) -> &[Notification] {
        let end = limit.min(self.notifications.len());
        &self.notifications[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use rstest::rstest;

    fn store() -> NotificationStore {
        NotificationStore::new(mock::notifications(Utc::now()))
    }

    #[test]
    fn canned_list_has_two_unread() {
        assert_eq!(store().unread_count(), 2);
    }

    #[test]
    fn mark_as_read_flips_only_the_target() {
        let mut store = store();
        assert!(store.mark_as_read("1"));
        assert_eq!(store.unread_count(), 1);
        assert!(store.all()[0].read);
        assert!(!store.all()[1].read);
    }

    #[test]
    fn mark_as_read_unknown_id_is_noop() {
        let mut store = store();
        let before = store.clone();
        assert!(!store.mark_as_read("missing"));
        assert_eq!(store, before);
    }

    #[rstest]
    #[case::canned(mock::notifications(Utc::now()))]
    #[case::empty(Vec::new())]
    #[case::all_read(mock::notifications(Utc::now()).into_iter().map(|mut n| { n.read = true; n }).collect())]
    fn mark_all_as_read_zeroes_unread(#[case] notifications: Vec<Notification>) {
        let mut store = NotificationStore::new(notifications);
        store.mark_all_as_read();
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn delete_and_clear() {
        let mut store = store();
        assert!(store.delete("2"));
        assert!(!store.delete("2"));
        assert_eq!(store.len(), 2);
        assert!(store.all().iter().all(|n| n.id != "2"));

        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(store.unread_count(), 0);
    }

    #[rstest]
    #[case(ReadFilter::All, &["1", "2", "3"])]
    #[case(ReadFilter::Unread, &["1", "2"])]
    #[case(ReadFilter::Read, &["3"])]
    fn filter_by_read_state(#[case] filter: ReadFilter, #[case] expected: &[&str]) {
        let store = store();
        let ids: Vec<&str> = store.filter(filter).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn preview_caps_at_limit() {
        let store = store();
        assert_eq!(store.preview(PREVIEW_LIMIT).len(), 3);
        assert_eq!(store.preview(1)[0].id, "1");
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_value(&store().all()[1]).expect("json");
        assert_eq!(json["type"], "warning");
    }

    #[test]
    fn read_filter_parses() {
        assert_eq!("unread".parse::<ReadFilter>(), Ok(ReadFilter::Unread));
        assert!("bogus".parse::<ReadFilter>().is_err());
    }
}
