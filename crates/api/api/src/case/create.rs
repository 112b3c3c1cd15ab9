use actix_web::web::{Data, Json};
use procura_api_utils::context::ProcuraContext;
use procura_db_views_local_user::LocalUserView;
use procura_db_views_workflow::api::CreateCaseResponse;
use procura_utils::error::ProcuraResult;
use procura_workflow::case_code::{create_case, MAX_CASE_CODE_ATTEMPTS};
use tracing::warn;

pub async fn create_procurement_case(
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<CreateCaseResponse>> {
  let mut attempt = 0;
  loop {
    attempt += 1;
    match create_case(&mut context.pool(), local_user_view.user_id()).await {
      Ok(case) => return Ok(Json(CreateCaseResponse { case })),
      // Generation + insert restarts from scratch; each attempt was one
      // all-or-nothing transaction, so there is nothing to clean up.
      Err(e) if e.is_retryable() && attempt < MAX_CASE_CODE_ATTEMPTS => {
        warn!("Lost a case code race, retrying ({attempt}/{MAX_CASE_CODE_ATTEMPTS})");
      }
      Err(e) => return Err(e),
    }
  }
}
