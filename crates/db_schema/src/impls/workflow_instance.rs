use crate::{
  newtypes::WorkflowInstanceId,
  source::workflow_instance::{
    WorkflowInstance,
    WorkflowInstanceInsertForm,
    WorkflowInstanceUpdateForm,
  },
  traits::Crud,
  utils::{get_conn, DbPool},
};
use diesel::QueryDsl;
use diesel_async::RunQueryDsl;
use procura_db_schema_file::schema::workflow_instance;
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl Crud for WorkflowInstance {
  type InsertForm = WorkflowInstanceInsertForm;
  type UpdateForm = WorkflowInstanceUpdateForm;
  type IdType = WorkflowInstanceId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(workflow_instance::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntCreateWorkflowInstance)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(workflow_instance::table.find(id).first(conn).await?)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(workflow_instance::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntUpdateWorkflowInstance)
  }
}
