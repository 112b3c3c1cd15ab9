use actix_web::{
  body::MessageBody,
  dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
  Error,
  HttpMessage,
};
use core::future::Ready;
use futures_util::future::LocalBoxFuture;
use procura_api_utils::context::ProcuraContext;
use procura_db_schema::{
  newtypes::LocalUserId,
  source::{local_user::LocalUser, role::RoleMember},
  traits::Crud,
};
use procura_db_views_local_user::LocalUserView;
use std::{future::ready, rc::Rc};

/// The trusted user-id header set by the authenticating gateway in front of
/// this service. The engine never authenticates; it only materializes the
/// session the gateway asserted.
const AUTH_USER_HEADER: &str = "x-procura-user";

#[derive(Clone)]
pub struct SessionMiddleware {
  context: ProcuraContext,
}

impl SessionMiddleware {
  pub fn new(context: ProcuraContext) -> Self {
    SessionMiddleware { context }
  }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = SessionService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(SessionService {
      service: Rc::new(service),
      context: self.context.clone(),
    }))
  }
}

pub struct SessionService<S> {
  service: Rc<S>,
  context: ProcuraContext,
}

impl<S, B> Service<ServiceRequest> for SessionService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let svc = self.service.clone();
    let context = self.context.clone();

    Box::pin(async move {
      let asserted_user = req
        .headers()
        .get(AUTH_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i32>().ok())
        .map(LocalUserId);

      if let Some(user_id) = asserted_user {
        // Ignore an id the gateway asserted for a user that no longer
        // exists; the request then simply has no session.
        let local_user_view = local_user_view_for(&context, user_id).await;
        if let Some(local_user_view) = local_user_view {
          req.extensions_mut().insert(local_user_view);
        }
      }

      svc.call(req).await
    })
  }
}

async fn local_user_view_for(
  context: &ProcuraContext,
  user_id: LocalUserId,
) -> Option<LocalUserView> {
  let local_user = LocalUser::read(&mut context.pool(), user_id).await.ok()?;
  let roles = RoleMember::codes_for_user(&mut context.pool(), user_id)
    .await
    .ok()?;
  Some(LocalUserView { local_user, roles })
}
