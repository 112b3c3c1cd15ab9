use actix_web::web::{Data, Json};
use procura_api_utils::{context::ProcuraContext, utils::is_admin};
use procura_db_views_local_user::LocalUserView;
use procura_db_views_workflow::api::{CreateWorkflowDefinition, WorkflowDefinitionResponse};
use procura_utils::error::ProcuraResult;
use procura_workflow::definition::create_definition;

pub async fn create_workflow_definition(
  data: Json<CreateWorkflowDefinition>,
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<WorkflowDefinitionResponse>> {
  is_admin(&local_user_view)?;

  let definition =
    create_definition(&mut context.pool(), &data.code, data.version, &data.steps).await?;

  Ok(Json(WorkflowDefinitionResponse { definition }))
}
