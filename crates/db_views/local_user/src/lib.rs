use procura_db_schema::source::local_user::LocalUser;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(optional_fields, export))]
/// The acting user for a request: the user row plus the role codes the
/// session provider resolved for them.
#[serde(rename_all = "camelCase")]
pub struct LocalUserView {
  pub local_user: LocalUser,
  pub roles: Vec<String>,
}

impl LocalUserView {
  pub fn user_id(&self) -> procura_db_schema::newtypes::LocalUserId {
    self.local_user.id
  }
}

/// The session middleware authenticates the request and inserts a
/// `LocalUserView` into the request extensions; handlers only consume it.
/// A request that never went through the middleware has no session.
#[cfg(feature = "full")]
impl actix_web::FromRequest for LocalUserView {
  type Error = procura_utils::error::ProcuraError;
  type Future = std::future::Ready<Result<Self, Self::Error>>;

  fn from_request(
    req: &actix_web::HttpRequest,
    _payload: &mut actix_web::dev::Payload,
  ) -> Self::Future {
    use actix_web::HttpMessage;
    std::future::ready(
      req
        .extensions()
        .get::<LocalUserView>()
        .cloned()
        .ok_or_else(|| procura_utils::error::ProcuraErrorType::NotLoggedIn.into()),
    )
  }
}
