use procura_db_schema::{
  newtypes::LocalUserId,
  source::{local_user::LocalUser, role::RoleMember},
  traits::Crud,
  utils::DbPool,
};
use procura_utils::error::{ProcuraErrorExt2, ProcuraErrorType, ProcuraResult};
use serde_json::Value;

/// A stored assignee designation, decoded from the text kept on a step
/// template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeSpec {
  /// A direct user id.
  User(LocalUserId),
  /// A single role code.
  Role(String),
  /// A JSON-array list of role codes, the older writer's shape.
  Roles(Vec<String>),
}

impl AssigneeSpec {
  /// Decodes a stored spec. A value that parses as a JSON array is a role
  /// code list; otherwise an all-digit value is a direct user id and
  /// anything else is one role code.
  pub fn parse(raw: &str) -> Self {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
      let codes = items
        .into_iter()
        .filter_map(|item| match item {
          Value::String(code) => Some(code),
          Value::Number(id) => Some(id.to_string()),
          _ => None,
        })
        .collect();
      return AssigneeSpec::Roles(codes);
    }

    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i32>() {
      return AssigneeSpec::User(LocalUserId(id));
    }
    AssigneeSpec::Role(trimmed.to_string())
  }
}

/// Resolves a spec to the concrete user ids allowed to act. Fails
/// `NoApproversFound` when the result is empty; a step nobody can approve
/// must never be created.
pub async fn resolve_assignees(
  pool: &mut DbPool<'_>,
  spec: &AssigneeSpec,
) -> ProcuraResult<Vec<LocalUserId>> {
  let resolved = match spec {
    AssigneeSpec::User(id) => {
      let user = LocalUser::read(pool, *id)
        .await
        .with_procura_type(ProcuraErrorType::NoApproversFound)?;
      vec![user.id]
    }
    AssigneeSpec::Role(code) => {
      RoleMember::members_of_codes(pool, std::slice::from_ref(code)).await?
    }
    AssigneeSpec::Roles(codes) => RoleMember::members_of_codes(pool, codes).await?,
  };

  if resolved.is_empty() {
    return Err(ProcuraErrorType::NoApproversFound.into());
  }
  Ok(resolved)
}

/// The canonical encoding for new `assigned_to` writes: a JSON array of
/// user-id strings.
pub fn encode_assignees(ids: &[LocalUserId]) -> String {
  let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
  serde_json::to_string(&ids).unwrap_or_default()
}

/// The one assignment-membership test, used everywhere a stored
/// `assigned_to` value is checked against an acting user.
///
/// Two generations of writers left two encodings behind: a bare user id and
/// a JSON array of ids (sometimes with unquoted numbers). Rows are not
/// normalized in place, so this predicate must keep accepting both.
pub fn matches_assignee(stored: &str, user_id: LocalUserId) -> bool {
  if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(stored) {
    return items.iter().any(|item| match item {
      Value::String(s) => s.trim().parse::<i32>() == Ok(user_id.0),
      Value::Number(n) => n.as_i64() == Some(i64::from(user_id.0)),
      _ => false,
    });
  }
  stored.trim() == user_id.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use procura_db_schema::{test_data::TestData, utils::build_db_pool_for_tests};
  use procura_utils::error::ProcuraResult;
  use serial_test::serial;

  #[test]
  fn parses_all_three_shapes() {
    assert_eq!(AssigneeSpec::User(LocalUserId(42)), AssigneeSpec::parse("42"));
    assert_eq!(
      AssigneeSpec::Role("KPA".to_string()),
      AssigneeSpec::parse("KPA")
    );
    assert_eq!(
      AssigneeSpec::Roles(vec!["KPA".to_string(), "PPK".to_string()]),
      AssigneeSpec::parse(r#"["KPA","PPK"]"#)
    );
    // A singleton array is still the list shape, not a bare role
    assert_eq!(
      AssigneeSpec::Roles(vec!["KPA".to_string()]),
      AssigneeSpec::parse(r#"["KPA"]"#)
    );
  }

  #[test]
  fn matches_both_encodings_exactly_once() {
    let user = LocalUserId(7);
    assert!(matches_assignee("7", user));
    assert!(matches_assignee(r#"["7"]"#, user));
    assert!(matches_assignee(r#"["3","7"]"#, user));
    // The legacy writer did not always quote ids
    assert!(matches_assignee("[3,7]", user));

    assert!(!matches_assignee("8", user));
    assert!(!matches_assignee(r#"["8"]"#, user));
    assert!(!matches_assignee(r#"["KPA"]"#, user));
    assert!(!matches_assignee("", user));
  }

  #[test]
  fn encode_produces_the_canonical_shape() {
    let encoded = encode_assignees(&[LocalUserId(3), LocalUserId(7)]);
    assert_eq!(r#"["3","7"]"#, encoded);
    assert!(matches_assignee(&encoded, LocalUserId(3)));
    assert!(matches_assignee(&encoded, LocalUserId(7)));
  }

  #[tokio::test]
  #[serial]
  async fn bare_and_array_role_specs_resolve_identically() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;

    let bare = resolve_assignees(pool, &AssigneeSpec::parse("KPA")).await?;
    let array = resolve_assignees(pool, &AssigneeSpec::parse(r#"["KPA"]"#)).await?;

    let mut bare_sorted = bare.clone();
    bare_sorted.sort_by_key(|id| id.0);
    let mut array_sorted = array;
    array_sorted.sort_by_key(|id| id.0);
    assert_eq!(bare_sorted, array_sorted);

    let mut expected = vec![data.alice.id, data.bob.id];
    expected.sort_by_key(|id| id.0);
    assert_eq!(expected, bare_sorted);

    // Nobody is in a nonexistent role
    let err = resolve_assignees(pool, &AssigneeSpec::parse("NOBODY"))
      .await
      .map(|_| ());
    assert!(err.is_err());

    data.delete(pool).await?;
    Ok(())
  }
}
