use actix_web::web::{Data, Json};
use procura_api_utils::{context::ProcuraContext, utils::is_admin};
use procura_db_views_local_user::LocalUserView;
use procura_db_views_workflow::api::{CancelWorkflowInstance, WorkflowInstanceResponse};
use procura_utils::error::ProcuraResult;
use procura_workflow::instance::cancel_instance;

pub async fn cancel_workflow_instance(
  data: Json<CancelWorkflowInstance>,
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<WorkflowInstanceResponse>> {
  is_admin(&local_user_view)?;

  let instance = cancel_instance(&mut context.pool(), data.instance_id).await?;

  Ok(Json(WorkflowInstanceResponse { instance }))
}
