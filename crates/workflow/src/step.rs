use crate::assignee::matches_assignee;
use chrono::Utc;
use diesel_async::scoped_futures::ScopedFutureExt;
use procura_db_schema::{
  newtypes::StepInstanceId,
  source::{
    local_user::LocalUser,
    step_instance::{StepInstance, StepInstanceUpdateForm},
    workflow_instance::{WorkflowInstance, WorkflowInstanceUpdateForm},
  },
  traits::Crud,
  utils::{get_conn, DbPool},
};
use procura_db_schema_file::enums::{StepInstanceStatus, WorkflowInstanceStatus};
use procura_db_views_workflow::api::StepAction;
use procura_utils::error::{ProcuraErrorType, ProcuraResult};
use tracing::info;

/// Applies an approver action to a pending step and derives the instance
/// status from the outcome, all inside one transaction:
///
/// - `Approve` on the last step completes the instance; on any other step
///   the instance stays in progress and the next pending step simply becomes
///   the current one.
/// - `Reject` anywhere rejects the instance immediately. Later steps are
///   left untouched; the instance status keeps them out of every inbox.
/// - `Skip` closes the step without approval and is gated exactly like
///   `Reject`.
///
/// A step that is already terminal fails `InvalidTransition` and nothing
/// changes. The actor must be among the step's resolved assignees (either
/// stored encoding) or an admin.
pub async fn transition_step(
  pool: &mut DbPool<'_>,
  step_instance_id: StepInstanceId,
  action: StepAction,
  actor: &LocalUser,
) -> ProcuraResult<StepInstance> {
  let step = StepInstance::read(pool, step_instance_id).await?;
  if !actor.admin && !matches_assignee(&step.assigned_to, actor.id) {
    return Err(ProcuraErrorType::NotAllowed.into());
  }

  let actor_id = actor.id;
  let conn = &mut get_conn(pool).await?;
  let updated = conn
    .run_transaction(|conn| {
      async move {
        // Re-read inside the transaction: a concurrent caller may have
        // terminated the step after the check above.
        let step = StepInstance::read(&mut conn.into(), step_instance_id).await?;
        if step.status.is_terminal() {
          return Err(ProcuraErrorType::InvalidTransition.into());
        }
        let instance = WorkflowInstance::read(&mut conn.into(), step.instance_id).await?;
        if instance.status.is_terminal() {
          return Err(ProcuraErrorType::InvalidTransition.into());
        }

        let next_status = match action {
          StepAction::Approve => StepInstanceStatus::Approved,
          StepAction::Reject => StepInstanceStatus::Rejected,
          StepAction::Skip => StepInstanceStatus::Skipped,
        };
        let step_form = StepInstanceUpdateForm {
          status: Some(next_status),
          approver_id: Some(Some(actor_id)),
          approved_at: Some(Some(Utc::now())),
        };
        let updated = StepInstance::update(&mut conn.into(), step_instance_id, &step_form).await?;

        let instance_status = match action {
          StepAction::Approve if step.is_last => Some(WorkflowInstanceStatus::Completed),
          StepAction::Reject => Some(WorkflowInstanceStatus::Rejected),
          _ => None,
        };
        if let Some(status) = instance_status {
          let form = WorkflowInstanceUpdateForm {
            status: Some(status),
            updated_at: Some(Some(Utc::now())),
          };
          WorkflowInstance::update(&mut conn.into(), step.instance_id, &form).await?;
        }

        Ok(updated)
      }
      .scope_boxed()
    })
    .await?;

  info!(
    "Step {} of instance {} -> {}",
    updated.step_number, updated.instance_id, updated.status
  );
  Ok(updated)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
  use super::*;
  use crate::{
    case_code::create_case,
    definition::{activate_version, create_definition},
    instance::create_instance,
  };
  use diesel::{ExpressionMethods, QueryDsl};
  use diesel_async::RunQueryDsl;
  use pretty_assertions::assert_eq;
  use procura_db_schema::{
    test_data::TestData,
    utils::{build_db_pool_for_tests, get_conn},
  };
  use procura_db_schema_file::schema::workflow_definition;
  use procura_db_views_workflow::api::CreateStepTemplate;
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
    Ok(())
  }

  /// Three KPA-assigned steps, activated and instantiated for a fresh case.
  async fn setup(
    pool: &mut DbPool<'_>,
    data: &TestData,
    code: &str,
  ) -> ProcuraResult<Vec<StepInstance>> {
    cleanup(pool, code).await?;
    create_definition(
      pool,
      code,
      1,
      &[step("One", "KPA"), step("Two", "KPA"), step("Three", "KPA")],
    )
    .await?;
    activate_version(pool, code, 1).await?;
    let case = create_case(pool, data.carol.id).await?;
    let instance = create_instance(pool, code, case.id).await?;
    StepInstance::list_for_instance(pool, instance.id).await
  }

  #[tokio::test]
  #[serial]
  async fn approve_all_steps_completes_the_instance() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    let steps = setup(pool, &data, "TRN-DONE").await?;

    let first = transition_step(pool, steps[0].id, StepAction::Approve, &data.alice).await?;
    assert_eq!(StepInstanceStatus::Approved, first.status);
    assert_eq!(Some(data.alice.id), first.approver_id);
    let instance = WorkflowInstance::read(pool, first.instance_id).await?;
    assert_eq!(WorkflowInstanceStatus::InProgress, instance.status);

    // The current step is now simply the lowest-numbered pending one
    let current = StepInstance::current_pending(pool, instance.id).await?.unwrap();
    assert_eq!(2, current.step_number);

    transition_step(pool, steps[1].id, StepAction::Approve, &data.bob).await?;
    let last = transition_step(pool, steps[2].id, StepAction::Approve, &data.alice).await?;
    assert!(last.is_last);
    let instance = WorkflowInstance::read(pool, last.instance_id).await?;
    assert_eq!(WorkflowInstanceStatus::Completed, instance.status);

    cleanup(pool, "TRN-DONE").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn terminal_steps_never_transition_again() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    let steps = setup(pool, &data, "TRN-TERM").await?;

    transition_step(pool, steps[0].id, StepAction::Approve, &data.alice).await?;
    let err = transition_step(pool, steps[0].id, StepAction::Approve, &data.alice)
      .await
      .unwrap_err();
    assert_eq!(ProcuraErrorType::InvalidTransition, err.error_type);

    // State is unchanged, including the original approver
    let reread = StepInstance::read(pool, steps[0].id).await?;
    assert_eq!(StepInstanceStatus::Approved, reread.status);
    assert_eq!(Some(data.alice.id), reread.approver_id);

    cleanup(pool, "TRN-TERM").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn reject_any_step_rejects_the_instance_immediately() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    let steps = setup(pool, &data, "TRN-REJ").await?;

    // Rejecting the middle step, not the first or last
    let rejected = transition_step(pool, steps[1].id, StepAction::Reject, &data.bob).await?;
    assert_eq!(StepInstanceStatus::Rejected, rejected.status);
    let instance = WorkflowInstance::read(pool, rejected.instance_id).await?;
    assert_eq!(WorkflowInstanceStatus::Rejected, instance.status);

    // Later steps stay pending but the rejected instance blocks them
    let third = StepInstance::read(pool, steps[2].id).await?;
    assert_eq!(StepInstanceStatus::Pending, third.status);
    let err = transition_step(pool, steps[2].id, StepAction::Approve, &data.alice)
      .await
      .unwrap_err();
    assert_eq!(ProcuraErrorType::InvalidTransition, err.error_type);

    cleanup(pool, "TRN-REJ").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn non_assignees_are_forbidden_and_admins_may_skip() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    let steps = setup(pool, &data, "TRN-PERM").await?;

    // carol is in no role, so she may not act on a KPA step
    let err = transition_step(pool, steps[0].id, StepAction::Approve, &data.carol)
      .await
      .unwrap_err();
    assert_eq!(ProcuraErrorType::NotAllowed, err.error_type);

    // The admin override goes through the same gated path
    let skipped = transition_step(pool, steps[0].id, StepAction::Skip, &data.admin).await?;
    assert_eq!(StepInstanceStatus::Skipped, skipped.status);
    let instance = WorkflowInstance::read(pool, skipped.instance_id).await?;
    assert_eq!(WorkflowInstanceStatus::InProgress, instance.status);

    cleanup(pool, "TRN-PERM").await?;
    data.delete(pool).await?;
    Ok(())
  }
}
