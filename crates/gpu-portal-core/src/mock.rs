//! Canned data standing in for the identity provider, the scheduler and the
//! notification service.
//!
//! Time-relative records take `now` so callers (and tests) agree on offsets.

use crate::catalog::GpuResource;
use crate::dashboard::{
    ActiveAllocation, AllocationStatus, ClusterAvailability, ModelAvailability, RecentRequest,
};
use crate::history::{RequestStatus, ResourceRequest};
use crate::notifications::{Notification, NotificationKind};
use crate::session::User;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

fn user(id: &str, name: &str, email: &str, organization: &str, role: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        organization: organization.to_string(),
        role: role.to_string(),
        avatar: Some(User::avatar_url(name)),
    }
}

/// Stable account id for an email address: the first 12 hex digits of the
/// SHA-256 of the trimmed, lowercased address.
pub fn account_id(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    hex::encode(&digest[..6])
}

/// User returned for an email/password sign-in. The password is not checked;
/// each address maps to its own account.
pub fn login_user(email: &str) -> User {
    user(
        &account_id(email),
        "Test User",
        email,
        "Research Lab",
        "researcher",
    )
}

pub fn google_user() -> User {
    user(
        "789012",
        "Google User",
        "google.user@example.com",
        "Research Institute",
        "researcher",
    )
}

pub fn github_user() -> User {
    user(
        "345678",
        "GitHub User",
        "github.user@example.com",
        "Tech Company",
        "developer",
    )
}

/// A freshly registered user. The id pairs the address's account id with the
/// registration time in ms, so concurrent registrations never share one.
pub fn registered_user(name: &str, email: &str, organization: &str, now: DateTime<Utc>) -> User {
    user(
        &format!("{}-{}", account_id(email), now.timestamp_millis()),
        name,
        email,
        organization,
        "researcher",
    )
}

fn notification(
    id: &str,
    title: &str,
    message: &str,
    kind: NotificationKind,
    read: bool,
    created_at: DateTime<Utc>,
) -> Notification {
    Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
        read,
        created_at,
    }
}

/// Initial notification list, newest first.
pub fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        notification(
            "1",
            "Resource Allocated",
            "Your GPU resource request has been approved and allocated.",
            NotificationKind::Success,
            false,
            now - Duration::minutes(30),
        ),
        notification(
            "2",
            "Resource Expiring",
            "Your allocated GPU resources will expire in 24 hours.",
            NotificationKind::Warning,
            false,
            now - Duration::hours(2),
        ),
        notification(
            "3",
            "System Maintenance",
            "Scheduled maintenance will occur on Friday, 6PM - 8PM.",
            NotificationKind::Info,
            true,
            now - Duration::days(1),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn gpu(
    id: &str,
    name: &str,
    memory_gb: u32,
    cores: u32,
    clock_speed: &str,
    power_draw: &str,
    available: u32,
    total: u32,
    location: &str,
) -> GpuResource {
    GpuResource {
        id: id.to_string(),
        name: name.to_string(),
        memory_gb,
        cores,
        clock_speed: clock_speed.to_string(),
        power_draw: power_draw.to_string(),
        available,
        total,
        location: location.to_string(),
    }
}

/// The GPU catalog.
pub fn catalog() -> Vec<GpuResource> {
    vec![
        gpu("1", "NVIDIA RTX 4090", 24, 16384, "2.52 GHz", "450W", 5, 16, "Rack A1"),
        gpu("2", "NVIDIA A100", 80, 6912, "1.41 GHz", "400W", 3, 8, "Rack B2"),
        gpu("3", "NVIDIA V100", 32, 5120, "1.53 GHz", "300W", 6, 16, "Rack C1"),
        gpu("4", "NVIDIA T4", 16, 2560, "1.59 GHz", "70W", 2, 8, "Rack D3"),
        gpu("5", "AMD Radeon Pro VII", 16, 3840, "1.7 GHz", "250W", 4, 8, "Rack A2"),
        gpu("6", "AMD MI250X", 128, 14080, "1.7 GHz", "560W", 1, 4, "Rack B3"),
    ]
}

struct HistoryRow {
    id: &'static str,
    gpu_type: &'static str,
    quantity: u32,
    requested_days_ago: i64,
    window: Option<(i64, i64)>,
    status: RequestStatus,
    project_name: &'static str,
    research_field: &'static str,
    rejection_reason: Option<&'static str>,
}

const HISTORY: [HistoryRow; 6] = [
    HistoryRow {
        id: "101",
        gpu_type: "NVIDIA RTX 4090",
        quantity: 1,
        requested_days_ago: 30,
        window: Some((-28, -21)),
        status: RequestStatus::Completed,
        project_name: "Computer Vision Research",
        research_field: "Computer Vision",
        rejection_reason: None,
    },
    HistoryRow {
        id: "102",
        gpu_type: "NVIDIA A100",
        quantity: 2,
        requested_days_ago: 15,
        window: Some((-13, 1)),
        status: RequestStatus::Active,
        project_name: "NLP Model Training",
        research_field: "Natural Language Processing",
        rejection_reason: None,
    },
    HistoryRow {
        id: "103",
        gpu_type: "NVIDIA T4",
        quantity: 1,
        requested_days_ago: 5,
        window: None,
        status: RequestStatus::Pending,
        project_name: "Reinforcement Learning Experiment",
        research_field: "Reinforcement Learning",
        rejection_reason: None,
    },
    HistoryRow {
        id: "104",
        gpu_type: "NVIDIA V100",
        quantity: 1,
        requested_days_ago: 10,
        window: None,
        status: RequestStatus::Rejected,
        project_name: "Data Analysis Pipeline",
        research_field: "Data Analysis",
        rejection_reason: Some("Insufficient resources available for requested time period."),
    },
    HistoryRow {
        id: "105",
        gpu_type: "AMD MI250X",
        quantity: 1,
        requested_days_ago: 8,
        window: None,
        status: RequestStatus::Cancelled,
        project_name: "Scientific Simulation",
        research_field: "Scientific Simulation",
        rejection_reason: None,
    },
    HistoryRow {
        id: "106",
        gpu_type: "NVIDIA RTX 4090",
        quantity: 2,
        requested_days_ago: 2,
        window: None,
        status: RequestStatus::Pending,
        project_name: "Image Generation Model",
        research_field: "Generative AI",
        rejection_reason: None,
    },
];

/// The signed-in user's request history.
pub fn request_history(now: DateTime<Utc>) -> Vec<ResourceRequest> {
    HISTORY
        .iter()
        .map(|row| ResourceRequest {
            id: row.id.to_string(),
            gpu_type: row.gpu_type.to_string(),
            quantity: row.quantity,
            requested_at: now - Duration::days(row.requested_days_ago),
            start_date: row.window.map(|(start, _)| now + Duration::days(start)),
            end_date: row.window.map(|(_, end)| now + Duration::days(end)),
            status: row.status,
            project_name: row.project_name.to_string(),
            project_description: None,
            research_field: row.research_field.to_string(),
            rejection_reason: row.rejection_reason.map(str::to_string),
        })
        .collect()
}

/// GPUs currently allocated to the user.
pub fn active_allocations(now: DateTime<Utc>) -> Vec<ActiveAllocation> {
    vec![
        ActiveAllocation {
            id: "1".to_string(),
            name: "NVIDIA RTX 4090".to_string(),
            memory_gb: 24,
            status: AllocationStatus::Active,
            expires_at: now + Duration::days(5),
        },
        ActiveAllocation {
            id: "2".to_string(),
            name: "NVIDIA A100".to_string(),
            memory_gb: 80,
            status: AllocationStatus::Active,
            expires_at: now + Duration::days(2),
        },
    ]
}

/// Latest requests shown on the dashboard.
pub fn recent_requests(now: DateTime<Utc>) -> Vec<RecentRequest> {
    let recent = |id: &str, gpu_type: &str, days_ago: i64, status, duration_days| RecentRequest {
        id: id.to_string(),
        gpu_type: gpu_type.to_string(),
        requested_at: now - Duration::days(days_ago),
        status,
        duration_days,
    };
    vec![
        recent("101", "NVIDIA RTX 4090", 5, RequestStatus::Approved, 7),
        recent("102", "NVIDIA A100", 3, RequestStatus::Approved, 14),
        recent("103", "NVIDIA T4", 1, RequestStatus::Pending, 30),
    ]
}

/// Cluster-wide availability with the per-model breakdown.
pub fn cluster_availability() -> ClusterAvailability {
    let model = |name: &str, total, available| ModelAvailability {
        name: name.to_string(),
        total,
        available,
    };
    ClusterAvailability {
        total: 48,
        in_use: 32,
        available: 16,
        models: vec![
            model("NVIDIA RTX 4090", 16, 5),
            model("NVIDIA A100", 8, 3),
            model("NVIDIA V100", 16, 6),
            model("NVIDIA T4", 8, 2),
        ],
    }
}
