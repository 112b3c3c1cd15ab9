#[cfg(feature = "full")]
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
#[cfg_attr(feature = "full", derive(DbEnum))]
#[cfg_attr(
  feature = "full",
  db_enum(
    existing_type_path = "crate::schema::sql_types::WorkflowInstanceStatusEnum",
    value_style = "verbatim"
  )
)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(export))]
/// The lifecycle status of a workflow instance. Every status other than
/// `InProgress` is terminal.
pub enum WorkflowInstanceStatus {
  #[default]
  InProgress,
  /// The last step was approved.
  Completed,
  /// Some step was rejected.
  Rejected,
  /// Administratively cancelled.
  Cancelled,
}

impl WorkflowInstanceStatus {
  pub fn is_terminal(&self) -> bool {
    *self != WorkflowInstanceStatus::InProgress
  }
}

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
#[cfg_attr(feature = "full", derive(DbEnum))]
#[cfg_attr(
  feature = "full",
  db_enum(
    existing_type_path = "crate::schema::sql_types::StepInstanceStatusEnum",
    value_style = "verbatim"
  )
)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(export))]
/// The status of one step within a workflow instance. Every status other
/// than `Pending` is terminal; a terminal step never changes again.
pub enum StepInstanceStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
  /// Administrative override, gated like a rejection.
  Skipped,
}

impl StepInstanceStatus {
  pub fn is_terminal(&self) -> bool {
    *self != StepInstanceStatus::Pending
  }
}

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
#[cfg_attr(feature = "full", derive(DbEnum))]
#[cfg_attr(
  feature = "full",
  db_enum(
    existing_type_path = "crate::schema::sql_types::NotificationRecipientTypeEnum",
    value_style = "verbatim"
  )
)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(export))]
/// Whether a notification targets one user or every member of a role.
pub enum NotificationRecipientType {
  #[default]
  User,
  Role,
}
