use crate::{
  newtypes::WorkflowDefinitionId,
  source::workflow_definition::{
    StepTemplate,
    StepTemplateInsertForm,
    WorkflowDefinition,
    WorkflowDefinitionInsertForm,
    WorkflowDefinitionUpdateForm,
  },
  traits::Crud,
  utils::{get_conn, DbPool},
};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::{scoped_futures::ScopedFutureExt, RunQueryDsl};
use procura_db_schema_file::schema::{workflow_definition, workflow_step_template};
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl Crud for WorkflowDefinition {
  type InsertForm = WorkflowDefinitionInsertForm;
  type UpdateForm = WorkflowDefinitionUpdateForm;
  type IdType = WorkflowDefinitionId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(workflow_definition::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntCreateWorkflowDefinition)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(workflow_definition::table.find(id).first(conn).await?)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(workflow_definition::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }
}

impl WorkflowDefinition {
  /// The currently active version for a code. Always a fresh storage read;
  /// active versions are never cached in-process.
  pub async fn read_active(pool: &mut DbPool<'_>, code: &str) -> ProcuraResult<Option<Self>> {
    let conn = &mut get_conn(pool).await?;
    workflow_definition::table
      .filter(workflow_definition::code.eq(code))
      .filter(workflow_definition::is_active.eq(true))
      .first::<Self>(conn)
      .await
      .optional()
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  pub async fn read_by_code_and_version(
    pool: &mut DbPool<'_>,
    code: &str,
    version: i32,
  ) -> ProcuraResult<Option<Self>> {
    let conn = &mut get_conn(pool).await?;
    workflow_definition::table
      .filter(workflow_definition::code.eq(code))
      .filter(workflow_definition::version.eq(version))
      .first::<Self>(conn)
      .await
      .optional()
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  /// Atomically makes `(code, version)` the only active version of `code`:
  /// deactivate every row of the code, then activate exactly the target row.
  /// When the target update matches zero rows the whole transaction rolls
  /// back, so the previously active version stays active and no observer
  /// ever sees the code with zero or two active versions.
  pub async fn activate(pool: &mut DbPool<'_>, code: &str, version: i32) -> ProcuraResult<Self> {
    let code = code.to_string();
    let conn = &mut get_conn(pool).await?;
    conn
      .run_transaction(|conn| {
        async move {
          diesel::update(workflow_definition::table.filter(workflow_definition::code.eq(&code)))
            .set(workflow_definition::is_active.eq(false))
            .execute(conn)
            .await?;

          // NotFound here aborts the transaction and undoes the deactivation
          let activated = diesel::update(
            workflow_definition::table
              .filter(workflow_definition::code.eq(&code))
              .filter(workflow_definition::version.eq(version)),
          )
          .set(workflow_definition::is_active.eq(true))
          .get_result::<Self>(conn)
          .await?;

          Ok(activated)
        }
        .scope_boxed()
      })
      .await
  }

  /// The definition's step templates, ordered by step number.
  pub async fn steps(
    pool: &mut DbPool<'_>,
    definition_id: WorkflowDefinitionId,
  ) -> ProcuraResult<Vec<StepTemplate>> {
    let conn = &mut get_conn(pool).await?;
    workflow_step_template::table
      .filter(workflow_step_template::definition_id.eq(definition_id))
      .order(workflow_step_template::step_number.asc())
      .load::<StepTemplate>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }
}

impl StepTemplate {
  pub async fn create_many(
    pool: &mut DbPool<'_>,
    forms: &[StepTemplateInsertForm],
  ) -> ProcuraResult<Vec<Self>> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(workflow_step_template::table)
      .values(forms)
      .get_results::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntCreateWorkflowDefinition)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used)]
  use crate::{
    source::workflow_definition::{WorkflowDefinition, WorkflowDefinitionInsertForm},
    traits::Crud,
    utils::{build_db_pool_for_tests, get_conn, DbPool},
  };
  use diesel::{ExpressionMethods, QueryDsl};
  use diesel_async::RunQueryDsl;
  use pretty_assertions::assert_eq;
  use procura_db_schema_file::schema::workflow_definition;
  use procura_utils::error::{ProcuraErrorType, ProcuraResult};
  use serial_test::serial;

  async fn cleanup(pool: &mut DbPool<'_>, code: &str) -> ProcuraResult<()> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(workflow_definition::table.filter(workflow_definition::code.eq(code)))
      .execute(conn)
      .await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn activate_switches_versions_atomically() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    cleanup(pool, "APV-ACT").await?;

    let v1 =
      WorkflowDefinition::create(pool, &WorkflowDefinitionInsertForm::new("APV-ACT".into(), 1))
        .await?;
    let v2 =
      WorkflowDefinition::create(pool, &WorkflowDefinitionInsertForm::new("APV-ACT".into(), 2))
        .await?;
    assert!(!v1.is_active);
    assert!(!v2.is_active);

    let activated = WorkflowDefinition::activate(pool, "APV-ACT", 2).await?;
    assert!(activated.is_active);
    assert_eq!(2, activated.version);

    // Switching to v1 must leave exactly one active version
    let activated = WorkflowDefinition::activate(pool, "APV-ACT", 1).await?;
    assert!(activated.is_active);
    let v2 = WorkflowDefinition::read(pool, v2.id).await?;
    assert!(!v2.is_active);

    cleanup(pool, "APV-ACT").await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn activate_missing_version_rolls_back() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    cleanup(pool, "APV-MISS").await?;

    let v1 =
      WorkflowDefinition::create(pool, &WorkflowDefinitionInsertForm::new("APV-MISS".into(), 1))
        .await?;
    WorkflowDefinition::activate(pool, "APV-MISS", 1).await?;

    let err = WorkflowDefinition::activate(pool, "APV-MISS", 9)
      .await
      .unwrap_err();
    assert_eq!(ProcuraErrorType::NotFound, err.error_type);

    // The failed activation must not have deactivated v1
    let v1 = WorkflowDefinition::read(pool, v1.id).await?;
    assert!(v1.is_active);

    cleanup(pool, "APV-MISS").await?;
    Ok(())
  }
}
