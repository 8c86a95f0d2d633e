//! Sample notifications for a freshly seeded account.

use crate::rng::UniformSource;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SAMPLE_NOTIFICATION_COUNT: usize = 5;
/// Most notifications listed for one user.
pub const NOTIFICATION_LIST_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reorder,
    Anomaly,
    Forecast,
    System,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Reorder,
        NotificationKind::Anomaly,
        NotificationKind::Forecast,
        NotificationKind::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reorder  => "reorder",
            Self::Anomaly  => "anomaly",
            Self::Forecast => "forecast",
            Self::System   => "system",
        }
    }
}

/// A row of the `notifications` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification read back from storage, with its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNotification {
    pub id: i64,
    pub notification: Notification,
}

/// Five notifications spaced two hours apart, newest first.
pub fn generate_notifications<R: UniformSource>(
    user_id: Uuid,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Notification> {
    (0..SAMPLE_NOTIFICATION_COUNT)
        .map(|i| {
            let kind = *rng.pick(&NotificationKind::ALL);
            let (title, message) = compose(kind, i, rng);
            Notification {
                user_id,
                kind,
                title,
                message,
                read: rng.chance(0.5),
                created_at: now - Duration::hours(2 * i as i64),
            }
        })
        .collect()
}

fn compose<R: UniformSource>(kind: NotificationKind, i: usize, rng: &mut R) -> (String, String) {
    let product = format!("P00{}", i + 1);
    match kind {
        NotificationKind::Reorder => {
            let level = 100 + rng.below(50);
            (
                "Low Inventory Alert".into(),
                format!(
                    "Product {product} at Store S001 has reached reorder threshold. \
                     Current level: {level} units."
                ),
            )
        }
        NotificationKind::Anomaly => {
            let excess = rng.span(10.0, 30.0);
            (
                "Sales Anomaly Detected".into(),
                format!(
                    "Unusual sales pattern detected for Product {product}. \
                     Actual sales exceeded forecast by {excess:.1}%."
                ),
            )
        }
        NotificationKind::Forecast => {
            let direction = if rng.chance(0.5) { "decreased" } else { "increased" };
            let category = ["Electronics", "Clothing", "Food"][i % 3];
            (
                "Demand Forecast Update".into(),
                format!(
                    "Updated forecast shows {direction} demand for {category} category next week."
                ),
            )
        }
        NotificationKind::System => (
            "System Update".into(),
            "ML model has been retrained with latest data. \
             Prediction accuracy improved by 2.3%."
                .into(),
        ),
    }
}
