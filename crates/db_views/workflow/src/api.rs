use procura_db_schema::newtypes::{ProcurementCaseId, StepInstanceId, WorkflowInstanceId};
use procura_db_schema::source::{
  procurement_case::ProcurementCase,
  step_instance::StepInstance,
  workflow_definition::WorkflowDefinition,
  workflow_instance::WorkflowInstance,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// Make one version of a workflow definition the active one for its code.
#[serde(rename_all = "camelCase")]
pub struct ActivateWorkflowVersion {
  pub code: String,
  pub version: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct ActivateWorkflowVersionResponse {
  pub code: String,
  pub version: i32,
  /// Always the literal `ACTIVATED`.
  pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// One authored step of a new workflow definition. Step numbers are assigned
/// from the list position.
#[serde(rename_all = "camelCase")]
pub struct CreateStepTemplate {
  pub title: String,
  /// A user id, a role code, or a JSON array of role codes.
  pub assignee_spec: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// Author a new (inactive) version of a workflow definition.
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowDefinition {
  pub code: String,
  pub version: i32,
  pub steps: Vec<CreateStepTemplate>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// Start a workflow instance for a case, pinned to the currently active
/// version of the definition code.
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowInstance {
  pub definition_code: String,
  pub case_id: ProcurementCaseId,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstanceResponse {
  pub instance: WorkflowInstance,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(export))]
/// What an approver asks to do with a pending step. `Skip` is an
/// administrative override and is gated exactly like `Reject`.
pub enum StepAction {
  Approve,
  Reject,
  Skip,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct TransitionStep {
  pub step_instance_id: StepInstanceId,
  pub action: StepAction,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct StepInstanceResponse {
  pub step_instance: StepInstance,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct CancelWorkflowInstance {
  pub instance_id: WorkflowInstanceId,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinitionResponse {
  pub definition: WorkflowDefinition,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseResponse {
  pub case: ProcurementCase,
}
