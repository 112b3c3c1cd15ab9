use actix_web::web::{Data, Json};
use procura_api_utils::context::ProcuraContext;
use procura_db_views_local_user::LocalUserView;
use procura_db_views_workflow::api::{CreateWorkflowInstance, WorkflowInstanceResponse};
use procura_utils::error::ProcuraResult;
use procura_workflow::instance::create_instance;

pub async fn create_workflow_instance(
  data: Json<CreateWorkflowInstance>,
  context: Data<ProcuraContext>,
  // Any authenticated user may move a case into its workflow
  _local_user_view: LocalUserView,
) -> ProcuraResult<Json<WorkflowInstanceResponse>> {
  let instance = create_instance(&mut context.pool(), &data.definition_code, data.case_id).await?;

  Ok(Json(WorkflowInstanceResponse { instance }))
}
