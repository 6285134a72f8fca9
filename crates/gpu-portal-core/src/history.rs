//! Request history: lifecycle statuses, filtering, detail expansion and the
//! pending → cancelled transition.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Lifecycle status of a resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Active,
    Completed,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Active,
        RequestStatus::Completed,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Active => "active",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Capitalized badge text.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Active => "Active",
            RequestStatus::Completed => "Completed",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown request status '{}'", s))
    }
}

/// A request for GPU resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResourceRequest {
    pub id: String,
    pub gpu_type: String,
    pub quantity: u32,
    pub requested_at: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: RequestStatus,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    pub research_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Row actions offered for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Cancel,
    Extend,
    DownloadUsageReport,
    RequestSimilar,
}

impl RequestAction {
    pub fn label(&self) -> &'static str {
        match self {
            RequestAction::Cancel => "Cancel",
            RequestAction::Extend => "Extend",
            RequestAction::DownloadUsageReport => "Download Usage Report",
            RequestAction::RequestSimilar => "Request Similar Resources",
        }
    }
}

impl ResourceRequest {
    pub fn can_cancel(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    pub fn actions(&self) -> &'static [RequestAction] {
        match self.status {
            RequestStatus::Pending => &[RequestAction::Cancel],
            RequestStatus::Active => &[RequestAction::Extend, RequestAction::DownloadUsageReport],
            RequestStatus::Completed => &[
                RequestAction::DownloadUsageReport,
                RequestAction::RequestSimilar,
            ],
            _ => &[],
        }
    }

    /// Expiry shown under the badge of an active request.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            RequestStatus::Active => self.end_date,
            _ => None,
        }
    }
}

/// Rolling window on `requested_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TimeFrame {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "last90days")]
    Last90Days,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 4] = [
        TimeFrame::All,
        TimeFrame::Last7Days,
        TimeFrame::Last30Days,
        TimeFrame::Last90Days,
    ];

    pub fn window(&self) -> Option<Duration> {
        match self {
            TimeFrame::All => None,
            TimeFrame::Last7Days => Some(Duration::days(7)),
            TimeFrame::Last30Days => Some(Duration::days(30)),
            TimeFrame::Last90Days => Some(Duration::days(90)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::All => "all",
            TimeFrame::Last7Days => "last7days",
            TimeFrame::Last30Days => "last30days",
            TimeFrame::Last90Days => "last90days",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::All => "All Time",
            TimeFrame::Last7Days => "Last 7 Days",
            TimeFrame::Last30Days => "Last 30 Days",
            TimeFrame::Last90Days => "Last 90 Days",
        }
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TimeFrame::ALL
            .into_iter()
            .find(|frame| frame.as_str() == s)
            .ok_or_else(|| format!("unknown time frame '{}'", s))
    }
}

/// History filter. Every active predicate must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema, utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(default)]
pub struct HistoryFilter {
    /// Matches GPU type or project name (case-insensitive) or the id
    pub search: String,
    /// `None` (or `all` on the wire) keeps every status
    #[serde(deserialize_with = "status_or_all")]
    pub status: Option<RequestStatus>,
    pub time_frame: TimeFrame,
}

fn status_or_all<'de, D>(deserializer: D) -> std::result::Result<Option<RequestStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl HistoryFilter {
    pub fn matches(&self, request: &ResourceRequest, now: DateTime<Utc>) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = request.gpu_type.to_lowercase().contains(&needle)
                || request.project_name.to_lowercase().contains(&needle)
                || request.id.contains(&self.search);
            if !hit {
                return false;
            }
        }
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }
        if let Some(window) = self.time_frame.window() {
            if request.requested_at < now - window {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(
        &self,
        requests: &'a [ResourceRequest],
        now: DateTime<Utc>,
    ) -> Vec<&'a ResourceRequest> {
        requests.iter().filter(|r| self.matches(r, now)).collect()
    }
}

/// Which history row, if any, shows its detail panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailSelection {
    expanded: Option<String>,
}

impl DetailSelection {
    /// Expand `id`, or collapse it when it is already expanded.
    pub fn toggle(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

/// An owned list of requests with the local status transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHistory {
    requests: Vec<ResourceRequest>,
}

impl RequestHistory {
    pub fn new(requests: Vec<ResourceRequest>) -> Self {
        Self { requests }
    }

    pub fn requests(&self) -> &[ResourceRequest] {
        &self.requests
    }

    pub fn get(&self, id: &str) -> Option<&ResourceRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn filter(&self, filter: &HistoryFilter, now: DateTime<Utc>) -> Vec<&ResourceRequest> {
        filter.apply(&self.requests, now)
    }

    pub fn count_with_status(&self, status: RequestStatus) -> usize {
        self.requests.iter().filter(|r| r.status == status).count()
    }

    /// Cancel a pending request. Any other status is rejected and nothing
    /// changes.
    pub fn cancel(&mut self, id: &str) -> Result<&ResourceRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if !request.can_cancel() {
            return Err(Error::InvalidTransition {
                id: id.to_string(),
                action: "cancel",
                status: request.status,
            });
        }

        request.status = RequestStatus::Cancelled;
        debug!(request_id = %id, "request cancelled");
        Ok(request)
    }

    /// Next numeric id (one past the largest numeric id, starting at 101).
    pub fn next_id(&self) -> String {
        let next = self
            .requests
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .map_or(101, |max| max + 1);
        next.to_string()
    }

    pub fn push(&mut self, request: ResourceRequest) {
        self.requests.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use rstest::rstest;

    fn history(now: DateTime<Utc>) -> RequestHistory {
        RequestHistory::new(mock::request_history(now))
    }

    fn ids(list: &[&ResourceRequest]) -> Vec<String> {
        list.iter().map(|r| r.id.clone()).collect()
    }

    #[rstest]
    #[case(HistoryFilter::default(), &["101", "102", "103", "104", "105", "106"])]
    #[case(HistoryFilter { search: "rtx".into(), ..Default::default() }, &["101", "106"])]
    #[case(HistoryFilter { search: "nlp".into(), ..Default::default() }, &["102"])]
    #[case(HistoryFilter { search: "104".into(), ..Default::default() }, &["104"])]
    #[case(HistoryFilter { status: Some(RequestStatus::Pending), ..Default::default() }, &["103", "106"])]
    #[case(HistoryFilter { time_frame: TimeFrame::Last7Days, ..Default::default() }, &["103", "106"])]
    #[case(HistoryFilter { time_frame: TimeFrame::Last30Days, ..Default::default() }, &["101", "102", "103", "104", "105", "106"])]
    #[case(HistoryFilter { search: "model".into(), status: Some(RequestStatus::Pending), time_frame: TimeFrame::Last7Days }, &["106"])]
    #[case(HistoryFilter { search: "nvidia".into(), status: Some(RequestStatus::Cancelled), ..Default::default() }, &[])]
    fn filter_combinations(#[case] filter: HistoryFilter, #[case] expected: &[&str]) {
        let now = Utc::now();
        let history = history(now);
        assert_eq!(ids(&history.filter(&filter, now)), expected);
    }

    #[test]
    fn id_search_is_case_sensitive_but_text_is_not() {
        let now = Utc::now();
        let history = history(now);
        let filter = HistoryFilter {
            search: "IMAGE".into(),
            ..Default::default()
        };
        assert_eq!(ids(&history.filter(&filter, now)), ["106"]);
    }

    #[test]
    fn cancel_pending_changes_only_that_request() {
        let now = Utc::now();
        let mut history = history(now);
        let before = history.clone();

        let cancelled = history.cancel("103").expect("cancel");
        assert_eq!(cancelled.status, RequestStatus::Cancelled);

        for (after, original) in history.requests().iter().zip(before.requests()) {
            if after.id == "103" {
                assert_eq!(original.status, RequestStatus::Pending);
            } else {
                assert_eq!(after, original);
            }
        }
    }

    #[rstest]
    #[case("101", RequestStatus::Completed)]
    #[case("102", RequestStatus::Active)]
    #[case("104", RequestStatus::Rejected)]
    #[case("105", RequestStatus::Cancelled)]
    fn cancel_non_pending_is_rejected(#[case] id: &str, #[case] status: RequestStatus) {
        let mut history = history(Utc::now());
        let before = history.clone();

        let err = history.cancel(id).expect_err("must be rejected");

        assert_eq!(
            err,
            Error::InvalidTransition {
                id: id.to_string(),
                action: "cancel",
                status,
            }
        );
        assert_eq!(history, before);
    }

    #[test]
    fn cancel_unknown_id() {
        let mut history = history(Utc::now());
        assert_eq!(
            history.cancel("999").expect_err("unknown"),
            Error::NotFound("999".to_string())
        );
    }

    #[test]
    fn toggling_twice_collapses() {
        let mut selection = DetailSelection::default();
        selection.toggle("101");
        assert!(selection.is_expanded("101"));
        selection.toggle("101");
        assert_eq!(selection.expanded(), None);
    }

    #[test]
    fn selecting_another_row_replaces_expansion() {
        let mut selection = DetailSelection::default();
        selection.toggle("101");
        selection.toggle("102");
        assert!(!selection.is_expanded("101"));
        assert!(selection.is_expanded("102"));
        assert_eq!(selection.expanded(), Some("102"));
    }

    #[test]
    fn actions_follow_status() {
        let history = history(Utc::now());
        let actions = |id: &str| history.get(id).expect("request").actions();
        assert_eq!(actions("103"), &[RequestAction::Cancel]);
        assert_eq!(
            actions("102"),
            &[RequestAction::Extend, RequestAction::DownloadUsageReport]
        );
        assert_eq!(
            actions("101"),
            &[RequestAction::DownloadUsageReport, RequestAction::RequestSimilar]
        );
        assert!(actions("104").is_empty());
    }

    #[test]
    fn next_id_follows_largest() {
        assert_eq!(history(Utc::now()).next_id(), "107");
        assert_eq!(RequestHistory::default().next_id(), "101");
    }

    #[test]
    fn status_filter_accepts_all_on_the_wire() {
        let filter: HistoryFilter =
            serde_json::from_str(r#"{"status":"all","time_frame":"last90days"}"#).expect("json");
        assert_eq!(filter.status, None);
        assert_eq!(filter.time_frame, TimeFrame::Last90Days);

        let filter: HistoryFilter = serde_json::from_str(r#"{"status":"rejected"}"#).expect("json");
        assert_eq!(filter.status, Some(RequestStatus::Rejected));

        assert!(serde_json::from_str::<HistoryFilter>(r#"{"status":"bogus"}"#).is_err());
    }
}
