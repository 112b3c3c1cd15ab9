use actix_web::web::{Data, Json};
use procura_api_utils::context::ProcuraContext;
use procura_db_views_local_user::LocalUserView;
use procura_db_views_workflow::api::{StepInstanceResponse, TransitionStep};
use procura_utils::error::ProcuraResult;
use procura_workflow::step::transition_step;

pub async fn transition_workflow_step(
  data: Json<TransitionStep>,
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<StepInstanceResponse>> {
  // The assignment check belongs to the engine: it needs the stored
  // assignee encoding of the step itself.
  let step_instance = transition_step(
    &mut context.pool(),
    data.step_instance_id,
    data.action,
    &local_user_view.local_user,
  )
  .await?;

  Ok(Json(StepInstanceResponse { step_instance }))
}
