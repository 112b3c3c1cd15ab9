use crate::assignee::{encode_assignees, resolve_assignees, AssigneeSpec};
use chrono::Utc;
use diesel_async::scoped_futures::ScopedFutureExt;
use procura_db_schema::{
  newtypes::{ProcurementCaseId, WorkflowInstanceId},
  source::{
    step_instance::{StepInstance, StepInstanceInsertForm},
    workflow_definition::WorkflowDefinition,
    workflow_instance::{WorkflowInstance, WorkflowInstanceInsertForm, WorkflowInstanceUpdateForm},
  },
  traits::Crud,
  utils::{get_conn, DbPool},
};
use procura_db_schema_file::enums::WorkflowInstanceStatus;
use procura_utils::error::{ProcuraErrorType, ProcuraResult};
use tracing::info;

/// Starts a workflow instance for a case.
///
/// The currently active version of the definition code is read fresh and
/// pinned onto the instance; reactivating the code later never touches an
/// in-flight instance. All step instances are created in bulk, each with its
/// approver set resolved here and never re-resolved. Role lookups run before
/// the write transaction so the critical section stays short; if any step
/// resolves to nobody the creation fails before a single row is written.
pub async fn create_instance(
  pool: &mut DbPool<'_>,
  definition_code: &str,
  case_id: ProcurementCaseId,
) -> ProcuraResult<WorkflowInstance> {
  let Some(definition) = WorkflowDefinition::read_active(pool, definition_code).await? else {
    return Err(ProcuraErrorType::DefinitionNotActive.into());
  };

  let templates = WorkflowDefinition::steps(pool, definition.id).await?;
  if templates.is_empty() {
    return Err(ProcuraErrorType::EmptyWorkflowDefinition.into());
  }

  let mut assigned = Vec::with_capacity(templates.len());
  for template in &templates {
    let spec = AssigneeSpec::parse(&template.assignee_spec);
    let assignees = resolve_assignees(pool, &spec).await?;
    assigned.push(encode_assignees(&assignees));
  }

  let conn = &mut get_conn(pool).await?;
  let instance = conn
    .run_transaction(|conn| {
      async move {
        let instance = WorkflowInstance::create(
          &mut conn.into(),
          &WorkflowInstanceInsertForm::new(
            case_id,
            definition.code.clone(),
            definition.version,
          ),
        )
        .await?;

        let forms: Vec<StepInstanceInsertForm> = templates
          .iter()
          .zip(assigned)
          .map(|(template, assigned_to)| {
            StepInstanceInsertForm::new(
              instance.id,
              template.step_number,
              template.title.clone(),
              assigned_to,
              template.is_last,
            )
          })
          .collect();
        StepInstance::create_many(&mut conn.into(), &forms).await?;

        Ok(instance)
      }
      .scope_boxed()
    })
    .await?;

  info!(
    "Created workflow instance {} for case {} pinned to {} v{}",
    instance.id, case_id.0, instance.definition_code, instance.definition_version
  );
  Ok(instance)
}

/// Administrative cancellation of an in-flight instance. Terminal instances
/// stay as they are.
pub async fn cancel_instance(
  pool: &mut DbPool<'_>,
  instance_id: WorkflowInstanceId,
) -> ProcuraResult<WorkflowInstance> {
  let conn = &mut get_conn(pool).await?;
  let cancelled = conn
    .run_transaction(|conn| {
      async move {
        let instance = WorkflowInstance::read(&mut conn.into(), instance_id).await?;
        if instance.status.is_terminal() {
          return Err(ProcuraErrorType::InvalidTransition.into());
        }

        let form = WorkflowInstanceUpdateForm {
          status: Some(WorkflowInstanceStatus::Cancelled),
          updated_at: Some(Some(Utc::now())),
        };
        WorkflowInstance::update(&mut conn.into(), instance_id, &form).await
      }
      .scope_boxed()
    })
    .await?;

  info!("Cancelled workflow instance {instance_id}");
  Ok(cancelled)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
  use super::*;
  use crate::{
    case_code::create_case,
    definition::{activate_version, create_definition},
  };
  use diesel::{ExpressionMethods, QueryDsl};
  use diesel_async::RunQueryDsl;
  use pretty_assertions::assert_eq;
  use procura_db_schema::{
    test_data::TestData,
    utils::{build_db_pool_for_tests, get_conn},
  };
  use procura_db_schema_file::{enums::StepInstanceStatus, schema::workflow_definition};
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

  #[tokio::test]
  #[serial]
  async fn create_pins_version_and_resolves_steps() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "APV").await?;

    create_definition(
      pool,
      "APV",
      1,
      &[
        step("Prepare", "KPA"),
        step("Verify budget", r#"["KPA","PPK"]"#),
        step("Final approval", &data.admin.id.to_string()),
      ],
    )
    .await?;
    activate_version(pool, "APV", 1).await?;

    let case = create_case(pool, data.carol.id).await?;
    let instance = create_instance(pool, "APV", case.id).await?;
    assert_eq!("APV", instance.definition_code);
    assert_eq!(1, instance.definition_version);
    assert_eq!(WorkflowInstanceStatus::InProgress, instance.status);

    let steps = StepInstance::list_for_instance(pool, instance.id).await?;
    assert_eq!(3, steps.len());
    assert!(steps.iter().all(|s| s.status == StepInstanceStatus::Pending));

    // Step 2's spec was a role-code list; its assignees are the union of KPA and PPK members
    let second = &steps[1];
    assert!(crate::assignee::matches_assignee(&second.assigned_to, data.alice.id));
    assert!(crate::assignee::matches_assignee(&second.assigned_to, data.bob.id));
    assert!(!crate::assignee::matches_assignee(&second.assigned_to, data.carol.id));

    // Re-activating another version must not touch the pinned instance
    create_definition(pool, "APV", 2, &[step("Single", "KPA")]).await?;
    activate_version(pool, "APV", 2).await?;
    let reread = WorkflowInstance::read(pool, instance.id).await?;
    assert_eq!(1, reread.definition_version);

    cleanup(pool, "APV").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn create_without_approvers_leaves_nothing_behind() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "APV-EMPTY").await?;

    create_definition(
      pool,
      "APV-EMPTY",
      1,
      &[step("Prepare", "KPA"), step("Ghost step", "NO_SUCH_ROLE")],
    )
    .await?;
    activate_version(pool, "APV-EMPTY", 1).await?;

    let case = create_case(pool, data.carol.id).await?;
    let err = create_instance(pool, "APV-EMPTY", case.id)
      .await
      .unwrap_err();
    assert_eq!(ProcuraErrorType::NoApproversFound, err.error_type);

    cleanup(pool, "APV-EMPTY").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn create_requires_an_active_version() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "APV-INACTIVE").await?;

    create_definition(pool, "APV-INACTIVE", 1, &[step("Prepare", "KPA")]).await?;

    let case = create_case(pool, data.carol.id).await?;
    let err = create_instance(pool, "APV-INACTIVE", case.id)
      .await
      .unwrap_err();
    assert_eq!(ProcuraErrorType::DefinitionNotActive, err.error_type);

    cleanup(pool, "APV-INACTIVE").await?;
    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn cancel_is_terminal() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;
    cleanup(pool, "APV-CANCEL").await?;

    create_definition(pool, "APV-CANCEL", 1, &[step("Prepare", "KPA")]).await?;
    activate_version(pool, "APV-CANCEL", 1).await?;
    let case = create_case(pool, data.carol.id).await?;
    let instance = create_instance(pool, "APV-CANCEL", case.id).await?;

    let cancelled = cancel_instance(pool, instance.id).await?;
    assert_eq!(WorkflowInstanceStatus::Cancelled, cancelled.status);

    let err = cancel_instance(pool, instance.id).await.unwrap_err();
    assert_eq!(ProcuraErrorType::InvalidTransition, err.error_type);

    cleanup(pool, "APV-CANCEL").await?;
    data.delete(pool).await?;
    Ok(())
  }
}
