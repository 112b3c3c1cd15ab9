use actix_web::web::{Data, Json};
use procura_api_utils::{context::ProcuraContext, utils::is_notification_recipient};
use procura_db_schema::{source::notification::Notification, traits::Crud};
use procura_db_views_inbox_combined::api::{MarkNotificationArchived, SuccessResponse};
use procura_db_views_local_user::LocalUserView;
use procura_utils::error::{ProcuraErrorType, ProcuraResult};

pub async fn mark_notification_archived(
  data: Json<MarkNotificationArchived>,
  context: Data<ProcuraContext>,
  local_user_view: LocalUserView,
) -> ProcuraResult<Json<SuccessResponse>> {
  let notification = Notification::read(&mut context.pool(), data.notification_id).await?;
  if !is_notification_recipient(&local_user_view, &notification.recipient_id) {
    return Err(ProcuraErrorType::NotAllowed.into());
  }

  Notification::mark_archived(&mut context.pool(), notification.id).await?;

  Ok(Json(SuccessResponse::default()))
}
