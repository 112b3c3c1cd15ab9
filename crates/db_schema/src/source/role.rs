use crate::newtypes::{LocalUserId, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::{role, role_member};

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = role))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// A role, referenced by code from assignee specs and notifications.
#[serde(rename_all = "camelCase")]
pub struct Role {
  pub id: RoleId,
  pub code: String,
  pub name: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = role))]
pub struct RoleInsertForm {
  pub code: String,
  pub name: String,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
#[cfg_attr(feature = "full", derive(AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = role))]
pub struct RoleUpdateForm {
  pub name: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = role_member))]
#[cfg_attr(feature = "full", diesel(primary_key(role_id, local_user_id)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// Membership of a user in a role.
#[serde(rename_all = "camelCase")]
pub struct RoleMember {
  pub role_id: RoleId,
  pub local_user_id: LocalUserId,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = role_member))]
pub struct RoleMemberForm {
  pub role_id: RoleId,
  pub local_user_id: LocalUserId,
}
