use actix_web::web::{Data, Json};
use procura_api_utils::{context::ProcuraContext, utils::is_admin};
use procura_db_views_local_user::LocalUserView;
use procura_db_views_workflow::api::{ActivateWorkflowVersion, ActivateWorkflowVersionResponse};
use procura_utils::error::ProcuraResult;
use procura_workflow::definition::activate_version;

pub async fn activate_workflow_version(
  data: Json<ActivateWorkflowVersion>,
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<ActivateWorkflowVersionResponse>> {
  is_admin(&local_user_view)?;

  let activated = activate_version(&mut context.pool(), &data.code, data.version).await?;

  Ok(Json(ActivateWorkflowVersionResponse {
    code: activated.code,
    version: activated.version,
    status: "ACTIVATED".to_string(),
  }))
}
