use crate::InboxCombinedView;
use diesel::{BoolExpressionMethods, ExpressionMethods, QueryDsl, TextExpressionMethods};
use diesel_async::RunQueryDsl;
use procura_db_schema::{
  newtypes::LocalUserId,
  source::role::RoleMember,
  utils::{get_conn, DbPool},
};
use procura_db_schema_file::{
  enums::{NotificationRecipientType, StepInstanceStatus, WorkflowInstanceStatus},
  schema::{notification, step_instance, workflow_instance},
};
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl InboxCombinedView {
  /// Pending steps of in-progress instances assigned to the user.
  ///
  /// The SQL arms mirror `procura_workflow::assignee::matches_assignee`: a
  /// row's `assigned_to` either IS the bare user id (legacy writer) or is a
  /// JSON array holding the quoted id (canonical writer). The quotes in the
  /// pattern keep id `7` from matching id `17`, and the two arms are
  /// mutually exclusive per row, so a step counts exactly once.
  pub async fn get_pending_task_count(
    pool: &mut DbPool<'_>,
    user_id: LocalUserId,
  ) -> ProcuraResult<i64> {
    let conn = &mut get_conn(pool).await?;
    let bare = user_id.to_string();
    let quoted = format!("%\"{user_id}\"%");

    step_instance::table
      .inner_join(workflow_instance::table)
      .filter(step_instance::status.eq(StepInstanceStatus::Pending))
      .filter(workflow_instance::status.eq(WorkflowInstanceStatus::InProgress))
      .filter(
        step_instance::assigned_to
          .eq(bare)
          .or(step_instance::assigned_to.like(quoted)),
      )
      .count()
      .get_result::<i64>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  /// Unread, unarchived notifications addressed to the user directly or to
  /// any role the user belongs to.
  pub async fn get_unread_notification_count(
    pool: &mut DbPool<'_>,
    user_id: LocalUserId,
  ) -> ProcuraResult<i64> {
    let role_codes = RoleMember::codes_for_user(pool, user_id).await?;

    let conn = &mut get_conn(pool).await?;
    notification::table
      .filter(notification::read_at.is_null())
      .filter(notification::archived_at.is_null())
      .filter(
        notification::recipient_type
          .eq(NotificationRecipientType::User)
          .and(notification::recipient_id.eq(user_id.to_string()))
          .or(
            notification::recipient_type
              .eq(NotificationRecipientType::Role)
              .and(notification::recipient_id.eq_any(role_codes)),
          ),
      )
      .count()
      .get_result::<i64>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  /// Both badge counts. Two independent reads, no transaction and no locks;
  /// the view is polled and only needs eventual consistency.
  pub async fn get_counts(
    pool: &mut DbPool<'_>,
    user_id: LocalUserId,
  ) -> ProcuraResult<(i64, i64)> {
    let task_count = Self::get_pending_task_count(pool, user_id).await?;
    let notif_count = Self::get_unread_notification_count(pool, user_id).await?;
    Ok((task_count, notif_count))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
  use super::*;
  use diesel::ExpressionMethods;
  use pretty_assertions::assert_eq;
  use procura_db_schema::{
    source::notification::{Notification, NotificationInsertForm},
    test_data::TestData,
    traits::Crud,
    utils::build_db_pool_for_tests,
  };
  use procura_db_schema_file::schema::workflow_definition;
  use procura_db_views_workflow::api::CreateStepTemplate;
  use procura_workflow::{
    case_code::create_case,
    definition::{activate_version, create_definition},
    instance::create_instance,
  };
  use serial_test::serial;

  fn step(title: &str, spec: &str) -> CreateStepTemplate {
    CreateStepTemplate {
      title: title.to_string(),
      assignee_spec: spec.to_string(),
    }
  }

  async fn cleanup(pool: &mut DbPool<'_>, code: &str) -> ProcuraResult<()> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(workflow_definition::table.filter(workflow_definition::code.eq(code)))
      .execute(conn)
      .await?;
    diesel::delete(notification::table).execute(conn).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn counts_tasks_and_notifications_for_user_and_roles() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "INBOX").await?;

    create_definition(pool, "INBOX", 1, &[step("Review", "KPA")]).await?;
    activate_version(pool, "INBOX", 1).await?;
    let case = create_case(pool, data.carol.id).await?;
    create_instance(pool, "INBOX", case.id).await?;

    Notification::create(
      pool,
      &NotificationInsertForm::new(
        NotificationRecipientType::User,
        data.alice.id.to_string(),
        "Case assigned to you".to_string(),
      ),
    )
    .await?;
    Notification::create(
      pool,
      &NotificationInsertForm::new(
        NotificationRecipientType::Role,
        "KPA".to_string(),
        "New case for procurement leads".to_string(),
      ),
    )
    .await?;

    // alice: one pending KPA step, one direct and one role notification
    let (task_count, notif_count) = InboxCombinedView::get_counts(pool, data.alice.id).await?;
    assert_eq!(1, task_count);
    assert_eq!(2, notif_count);

    // carol has no roles and nothing addressed to her
    let (task_count, notif_count) = InboxCombinedView::get_counts(pool, data.carol.id).await?;
    assert_eq!(0, task_count);
    assert_eq!(0, notif_count);

    cleanup(pool, "INBOX").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn both_assignment_encodings_count_exactly_once() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "INBOX-ENC").await?;

    create_definition(
      pool,
      "INBOX-ENC",
      1,
      &[step("One", "KPA"), step("Two", "KPA")],
    )
    .await?;
    activate_version(pool, "INBOX-ENC", 1).await?;
    let case = create_case(pool, data.carol.id).await?;
    let instance = create_instance(pool, "INBOX-ENC", case.id).await?;

    // Rewrite the rows into the two historical shapes for the same user
    {
      let conn = &mut get_conn(pool).await?;
      diesel::update(
        step_instance::table
          .filter(step_instance::instance_id.eq(instance.id))
          .filter(step_instance::step_number.eq(1)),
      )
      .set(step_instance::assigned_to.eq(data.alice.id.to_string()))
      .execute(conn)
      .await?;
      diesel::update(
        step_instance::table
          .filter(step_instance::instance_id.eq(instance.id))
          .filter(step_instance::step_number.eq(2)),
      )
      .set(step_instance::assigned_to.eq(format!("[\"{}\"]", data.alice.id)))
      .execute(conn)
      .await?;
    }

    let count = InboxCombinedView::get_pending_task_count(pool, data.alice.id).await?;
    assert_eq!(2, count);

    // A user id that is a substring of alice's must not leak in
    let stranger = LocalUserId(data.alice.id.0 * 10 + 1);
    let count = InboxCombinedView::get_pending_task_count(pool, stranger).await?;
    assert_eq!(0, count);

    cleanup(pool, "INBOX-ENC").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn read_and_archived_notifications_never_count() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "INBOX-READ").await?;

    let unread = Notification::create(
      pool,
      &NotificationInsertForm::new(
        NotificationRecipientType::User,
        data.alice.id.to_string(),
        "First".to_string(),
      ),
    )
    .await?;
    Notification::create(
      pool,
      &NotificationInsertForm::new(
        NotificationRecipientType::User,
        data.alice.id.to_string(),
        "Second".to_string(),
      ),
    )
    .await?;

    assert_eq!(
      2,
      InboxCombinedView::get_unread_notification_count(pool, data.alice.id).await?
    );

    Notification::mark_read(pool, unread.id).await?;
    assert_eq!(
      1,
      InboxCombinedView::get_unread_notification_count(pool, data.alice.id).await?
    );

    cleanup(pool, "INBOX-READ").await?;
    data.delete(pool).await?;
    Ok(())
  }
}
