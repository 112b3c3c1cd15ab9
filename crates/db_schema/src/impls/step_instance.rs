use crate::{
  newtypes::{StepInstanceId, WorkflowInstanceId},
  source::step_instance::{StepInstance, StepInstanceInsertForm, StepInstanceUpdateForm},
  traits::Crud,
  utils::{get_conn, DbPool},
};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use procura_db_schema_file::enums::StepInstanceStatus;
use procura_db_schema_file::schema::step_instance;
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl Crud for StepInstance {
  type InsertForm = StepInstanceInsertForm;
  type UpdateForm = StepInstanceUpdateForm;
  type IdType = StepInstanceId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(step_instance::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntCreateStepInstance)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(step_instance::table.find(id).first(conn).await?)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(step_instance::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntUpdateStepInstance)
  }
}

impl StepInstance {
  /// All steps of an instance in step order, created in bulk when the
  /// instance is created.
  pub async fn create_many(
    pool: &mut DbPool<'_>,
    forms: &[StepInstanceInsertForm],
  ) -> ProcuraResult<Vec<Self>> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(step_instance::table)
      .values(forms)
      .get_results::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntCreateStepInstance)
  }

  pub async fn list_for_instance(
    pool: &mut DbPool<'_>,
    instance_id: WorkflowInstanceId,
  ) -> ProcuraResult<Vec<Self>> {
    let conn = &mut get_conn(pool).await?;
    step_instance::table
      .filter(step_instance::instance_id.eq(instance_id))
      .order(step_instance::step_number.asc())
      .load::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  /// The lowest-numbered step still pending for an instance, which is the
  /// instance's current step. There is no separate cursor column.
  pub async fn current_pending(
    pool: &mut DbPool<'_>,
    instance_id: WorkflowInstanceId,
  ) -> ProcuraResult<Option<Self>> {
    use diesel::OptionalExtension;
    let conn = &mut get_conn(pool).await?;
    step_instance::table
      .filter(step_instance::instance_id.eq(instance_id))
      .filter(step_instance::status.eq(StepInstanceStatus::Pending))
      .order(step_instance::step_number.asc())
      .first::<Self>(conn)
      .await
      .optional()
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }
}
