use diesel_async::scoped_futures::ScopedFutureExt;
use procura_db_schema::{
  source::workflow_definition::{
    StepTemplate,
    StepTemplateInsertForm,
    WorkflowDefinition,
    WorkflowDefinitionInsertForm,
  },
  traits::Crud,
  utils::{get_conn, DbPool},
};
use procura_db_views_workflow::api::CreateStepTemplate;
use procura_utils::{
  error::{ProcuraErrorType, ProcuraResult},
  MAX_WORKFLOW_STEPS,
};
use tracing::info;

/// Authors a new, inactive version of a definition together with its dense
/// 1..N step templates. The last step is marked so approval of it can
/// complete an instance without re-counting steps.
pub async fn create_definition(
  pool: &mut DbPool<'_>,
  code: &str,
  version: i32,
  steps: &[CreateStepTemplate],
) -> ProcuraResult<WorkflowDefinition> {
  if steps.is_empty() {
    return Err(ProcuraErrorType::EmptyWorkflowDefinition.into());
  }
  if steps.len() > MAX_WORKFLOW_STEPS {
    return Err(ProcuraErrorType::TooManyWorkflowSteps.into());
  }
  if WorkflowDefinition::read_by_code_and_version(pool, code, version)
    .await?
    .is_some()
  {
    return Err(ProcuraErrorType::WorkflowDefinitionAlreadyExists.into());
  }

  let code = code.to_string();
  let steps = steps.to_vec();
  let step_count = steps.len();
  let conn = &mut get_conn(pool).await?;
  let definition = conn
    .run_transaction(|conn| {
      async move {
        let definition = WorkflowDefinition::create(
          &mut conn.into(),
          &WorkflowDefinitionInsertForm::new(code, version),
        )
        .await?;

        let last_number = steps.len() as i32;
        let forms: Vec<StepTemplateInsertForm> = steps
          .iter()
          .enumerate()
          .map(|(idx, step)| {
            let step_number = idx as i32 + 1;
            StepTemplateInsertForm::new(
              definition.id,
              step_number,
              step.title.clone(),
              step.assignee_spec.clone(),
              step_number == last_number,
            )
          })
          .collect();
        StepTemplate::create_many(&mut conn.into(), &forms).await?;

        Ok(definition)
      }
      .scope_boxed()
    })
    .await?;

  info!(
    "Created workflow definition {} v{} with {step_count} steps",
    definition.code, definition.version
  );
  Ok(definition)
}

/// Makes `(code, version)` the single active version of its code. The switch
/// is atomic: any concurrent reader sees either the old or the new active
/// version, never both and never neither.
pub async fn activate_version(
  pool: &mut DbPool<'_>,
  code: &str,
  version: i32,
) -> ProcuraResult<WorkflowDefinition> {
  let activated = WorkflowDefinition::activate(pool, code, version).await?;
  info!("Activated workflow definition {code} v{version}");
  Ok(activated)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used)]
  use super::*;
  use pretty_assertions::assert_eq;
  use procura_db_schema::utils::{build_db_pool_for_tests, get_conn, DbPool};
  use diesel::{ExpressionMethods, QueryDsl};
  use diesel_async::RunQueryDsl;
  use procura_db_schema_file::schema::workflow_definition;
  use serial_test::serial;

  async fn cleanup(pool: &mut DbPool<'_>, code: &str) -> ProcuraResult<()> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(workflow_definition::table.filter(workflow_definition::code.eq(code)))
      .execute(conn)
      .await?;
    Ok(())
  }

  fn step(title: &str, spec: &str) -> CreateStepTemplate {
    CreateStepTemplate {
      title: title.to_string(),
      assignee_spec: spec.to_string(),
    }
  }

  #[tokio::test]
  #[serial]
  async fn create_marks_only_the_last_step() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    cleanup(pool, "DEF-LAST").await?;

    let definition = create_definition(
      pool,
      "DEF-LAST",
      1,
      &[step("Review", "KPA"), step("Check", "PPK"), step("Sign", "1")],
    )
    .await?;

    let steps = WorkflowDefinition::steps(pool, definition.id).await?;
    assert_eq!(vec![1, 2, 3], steps.iter().map(|s| s.step_number).collect::<Vec<_>>());
    assert_eq!(
      vec![false, false, true],
      steps.iter().map(|s| s.is_last).collect::<Vec<_>>()
    );

    cleanup(pool, "DEF-LAST").await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn create_rejects_empty_and_duplicate() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    cleanup(pool, "DEF-DUP").await?;

    let err = create_definition(pool, "DEF-DUP", 1, &[]).await.unwrap_err();
    assert_eq!(ProcuraErrorType::EmptyWorkflowDefinition, err.error_type);

    create_definition(pool, "DEF-DUP", 1, &[step("Only", "KPA")]).await?;
    let err = create_definition(pool, "DEF-DUP", 1, &[step("Only", "KPA")])
      .await
      .unwrap_err();
    assert_eq!(
      ProcuraErrorType::WorkflowDefinitionAlreadyExists,
      err.error_type
    );

    cleanup(pool, "DEF-DUP").await?;
    Ok(())
  }
}
