use crate::newtypes::{ProcurementCaseId, WorkflowInstanceId};
use chrono::{DateTime, Utc};
use procura_db_schema_file::enums::WorkflowInstanceStatus;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::workflow_instance;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_instance))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// One running execution of a workflow definition, bound to a procurement
/// case. The definition version is pinned at creation and never changes,
/// even if the code is reactivated to another version later.
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
  pub id: WorkflowInstanceId,
  pub case_id: ProcurementCaseId,
  pub definition_code: String,
  pub definition_version: i32,
  pub status: WorkflowInstanceStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_instance))]
pub struct WorkflowInstanceInsertForm {
  pub case_id: ProcurementCaseId,
  pub definition_code: String,
  pub definition_version: i32,
  #[new(default)]
  pub status: Option<WorkflowInstanceStatus>,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
#[cfg_attr(feature = "full", derive(AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_instance))]
pub struct WorkflowInstanceUpdateForm {
  pub status: Option<WorkflowInstanceStatus>,
  pub updated_at: Option<Option<DateTime<Utc>>>,
}
