use procura_db_views_local_user::LocalUserView;
use procura_utils::error::{ProcuraErrorType, ProcuraResult};

/// Admin gate for the administrative engine operations (definition
/// authoring, activation, instance cancellation). Runs before any
/// transaction is opened.
pub fn is_admin(local_user_view: &LocalUserView) -> ProcuraResult<()> {
  if !local_user_view.local_user.admin {
    Err(ProcuraErrorType::NotAnAdmin)?
  } else {
    Ok(())
  }
}

/// Whether the acting user may see a notification addressed as
/// `(recipient_type = User, recipient_id)` or `(Role, recipient_id)`.
pub fn is_notification_recipient(local_user_view: &LocalUserView, recipient_id: &str) -> bool {
  local_user_view.local_user.id.to_string() == recipient_id
    || local_user_view.roles.iter().any(|code| code == recipient_id)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use procura_db_schema::{newtypes::LocalUserId, source::local_user::LocalUser};

  fn view(admin: bool, roles: &[&str]) -> LocalUserView {
    LocalUserView {
      local_user: LocalUser {
        id: LocalUserId(7),
        name: "gamon".to_string(),
        email: None,
        admin,
        created_at: Utc::now(),
      },
      roles: roles.iter().map(ToString::to_string).collect(),
    }
  }

  #[test]
  fn only_admins_pass_the_admin_gate() {
    assert!(is_admin(&view(true, &[])).is_ok());
    assert!(is_admin(&view(false, &[])).is_err());
  }

  #[test]
  fn recipient_check_covers_user_and_roles() {
    let v = view(false, &["KPA"]);
    assert!(is_notification_recipient(&v, "7"));
    assert!(is_notification_recipient(&v, "KPA"));
    assert!(!is_notification_recipient(&v, "8"));
    assert!(!is_notification_recipient(&v, "PPK"));
  }
}
