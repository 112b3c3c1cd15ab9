use actix_web::web::{Data, Json};
use procura_api_utils::context::ProcuraContext;
use procura_db_views_inbox_combined::{api::GetInboxCountResponse, InboxCombinedView};
use procura_db_views_local_user::LocalUserView;
use procura_utils::error::ProcuraResult;

pub async fn unread_count(
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<GetInboxCountResponse>> {
  let (task_count, notif_count) =
    InboxCombinedView::get_counts(&mut context.pool(), local_user_view.user_id()).await?;

  Ok(Json(GetInboxCountResponse {
    task_count,
    notif_count,
    total: task_count + notif_count,
  }))
}
