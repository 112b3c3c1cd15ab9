use crate::newtypes::{LocalUserId, StepInstanceId, WorkflowInstanceId};
use chrono::{DateTime, Utc};
use procura_db_schema_file::enums::StepInstanceStatus;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::step_instance;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = step_instance))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// The runtime state of one step within a workflow instance.
#[serde(rename_all = "camelCase")]
pub struct StepInstance {
  pub id: StepInstanceId,
  pub instance_id: WorkflowInstanceId,
  pub step_number: i32,
  pub title: String,
  /// User ids resolved from the template's assignee spec when the instance
  /// was created, never re-resolved. Canonical writes hold a JSON array of
  /// user-id strings; legacy rows may hold one bare user id.
  pub assigned_to: String,
  pub is_last: bool,
  pub status: StepInstanceStatus,
  /// Who performed the terminal transition.
  pub approver_id: Option<LocalUserId>,
  pub approved_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = step_instance))]
pub struct StepInstanceInsertForm {
  pub instance_id: WorkflowInstanceId,
  pub step_number: i32,
  pub title: String,
  pub assigned_to: String,
  pub is_last: bool,
  #[new(default)]
  pub status: Option<StepInstanceStatus>,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
#[cfg_attr(feature = "full", derive(AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = step_instance))]
pub struct StepInstanceUpdateForm {
  pub status: Option<StepInstanceStatus>,
  pub approver_id: Option<Option<LocalUserId>>,
  pub approved_at: Option<Option<DateTime<Utc>>>,
}
