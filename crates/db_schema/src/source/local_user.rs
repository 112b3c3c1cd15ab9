use crate::newtypes::LocalUserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use procura_db_schema_file::schema::local_user;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(Queryable, Selectable, Identifiable))]
#[cfg_attr(feature = "full", diesel(table_name = local_user))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// A user of the platform. Authentication lives outside this service; only
/// the identity and the admin flag matter here.
#[serde(rename_all = "camelCase")]
pub struct LocalUser {
  pub id: LocalUserId,
  pub name: String,
  pub email: Option<String>,
  pub admin: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[cfg_attr(feature = "full", derive(Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = local_user))]
pub struct LocalUserInsertForm {
  pub name: String,
  #[new(default)]
  pub email: Option<String>,
  #[new(default)]
  pub admin: Option<bool>,
  #[new(default)]
  pub created_at: Option<DateTime<Utc>>,
}

impl LocalUserInsertForm {
  pub fn test_form(name: &str) -> Self {
    Self::new(name.to_string())
  }
}

#[derive(Clone, Default)]
#[cfg_attr(feature = "full", derive(AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = local_user))]
pub struct LocalUserUpdateForm {
  pub email: Option<Option<String>>,
  pub admin: Option<bool>,
}
