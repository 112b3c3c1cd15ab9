use crate::newtypes::NotificationId;
use chrono::{DateTime, Utc};
use procura_db_schema_file::enums::NotificationRecipientType;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::notification;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = notification))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// A notification for a user or for every member of a role. Created once,
/// then only ever marked read or archived.
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id: NotificationId,
  pub recipient_type: NotificationRecipientType,
  /// A user id or a role code, depending on `recipient_type`.
  pub recipient_id: String,
  pub title: String,
  pub body: Option<String>,
  pub read_at: Option<DateTime<Utc>>,
  pub archived_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = notification))]
pub struct NotificationInsertForm {
  pub recipient_type: NotificationRecipientType,
  pub recipient_id: String,
  pub title: String,
  #[new(default)]
  pub body: Option<String>,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
#[cfg_attr(feature = "full", derive(AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = notification))]
pub struct NotificationUpdateForm {
  pub read_at: Option<Option<DateTime<Utc>>>,
  pub archived_at: Option<Option<DateTime<Utc>>>,
}
