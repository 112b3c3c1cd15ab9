use crate::newtypes::{LocalUserId, ProcurementCaseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::procurement_case;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = procurement_case))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// A procurement case. The case code is globally unique and sequential
/// within its calendar year, format `PROC-YYYY-NNNNNN`.
#[serde(rename_all = "camelCase")]
pub struct ProcurementCase {
  pub id: ProcurementCaseId,
  pub case_code: String,
  pub created_by: LocalUserId,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = procurement_case))]
pub struct ProcurementCaseInsertForm {
  pub case_code: String,
  pub created_by: LocalUserId,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}
