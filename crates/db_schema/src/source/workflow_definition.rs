use crate::newtypes::{StepTemplateId, WorkflowDefinitionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::{workflow_definition, workflow_step_template};

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_definition))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// One version of an approval process template. For a given code at most one
/// version is active at any committed instant.
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
  pub id: WorkflowDefinitionId,
  /// Business key shared by all versions of the process.
  pub code: String,
  pub version: i32,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_definition))]
pub struct WorkflowDefinitionInsertForm {
  pub code: String,
  pub version: i32,
  #[new(default)]
  pub is_active: Option<bool>,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
#[cfg_attr(feature = "full", derive(AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_definition))]
pub struct WorkflowDefinitionUpdateForm {
  pub is_active: Option<bool>,
}

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_step_template))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// One ordered step of a workflow definition. Step numbers are dense 1..N and
/// `is_last` marks step N.
#[serde(rename_all = "camelCase")]
pub struct StepTemplate {
  pub id: StepTemplateId,
  pub definition_id: WorkflowDefinitionId,
  pub step_number: i32,
  pub title: String,
  /// Who may act on the step: a user id, a role code, or a JSON array of
  /// role codes.
  pub assignee_spec: String,
  pub is_last: bool,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = workflow_step_template))]
pub struct StepTemplateInsertForm {
  pub definition_id: WorkflowDefinitionId,
  pub step_number: i32,
  pub title: String,
  pub assignee_spec: String,
  pub is_last: bool,
}
