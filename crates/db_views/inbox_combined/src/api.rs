use procura_db_schema::newtypes::NotificationId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// The inbox badge counts for the acting user.
#[serde(rename_all = "camelCase")]
pub struct GetInboxCountResponse {
  /// Pending approval steps assigned to the user.
  pub task_count: i64,
  /// Unread, unarchived notifications for the user or any of their roles.
  pub notif_count: i64,
  /// The badge total, always `task_count + notif_count`.
  pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// Mark a notification as read.
#[serde(rename_all = "camelCase")]
pub struct MarkNotificationRead {
  pub notification_id: NotificationId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// Archive a notification, removing it from the inbox for good.
#[serde(rename_all = "camelCase")]
pub struct MarkNotificationArchived {
  pub notification_id: NotificationId,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
  pub success: bool,
}

impl Default for SuccessResponse {
  fn default() -> Self {
    SuccessResponse { success: true }
  }
}
