use actix_web::web::{get, post, put, scope, ServiceConfig};
use procura_api::{
  case::create::create_procurement_case,
  inbox::{
    mark_archived::mark_notification_archived,
    mark_read::mark_notification_read,
    unread_count::unread_count,
  },
  workflow::{
    activate::activate_workflow_version,
    cancel::cancel_workflow_instance,
    create_definition::create_workflow_definition,
    create_instance::create_workflow_instance,
    transition::transition_workflow_step,
  },
};

pub fn config(cfg: &mut ServiceConfig) {
  cfg.service(
    scope("/api/v4")
      .service(
        scope("/workflow")
          .route("/definition", post().to(create_workflow_definition))
          .route("/definition/activate", put().to(activate_workflow_version))
          .route("/instance", post().to(create_workflow_instance))
          .route("/instance/cancel", post().to(cancel_workflow_instance))
          .route("/step/transition", post().to(transition_workflow_step)),
      )
      .service(scope("/case").route("", post().to(create_procurement_case)))
      .service(
        scope("/account")
          .route("/inbox-count", get().to(unread_count))
          .route("/notification/mark-read", post().to(mark_notification_read))
          .route(
            "/notification/mark-archived",
            post().to(mark_notification_archived),
          ),
      ),
  );
}
