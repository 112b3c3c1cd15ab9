pub mod api_routes;
pub mod session;

use actix_web::{middleware, web::Data, App, HttpServer};
use procura_api_utils::context::ProcuraContext;
use procura_db_schema::utils::build_db_pool;
use procura_utils::{error::ProcuraResult, settings::SETTINGS, VERSION};
use session::SessionMiddleware;
use tracing_actix_web::{DefaultRootSpanBuilder, TracingLogger};

/// Placing the main function in lib.rs allows other crates to import it and
/// embed the server.
pub async fn start_procura_server() -> ProcuraResult<()> {
  println!("Starting Procura v{VERSION}");

  // Set up the connection pool. This also runs any pending migrations.
  let pool = build_db_pool()?;
  let context = ProcuraContext::create(pool);

  println!(
    "Starting HTTP server at {}:{}",
    SETTINGS.bind, SETTINGS.port
  );

  let bind = (SETTINGS.bind.clone(), SETTINGS.port);
  HttpServer::new(move || {
    App::new()
      .wrap(middleware::Logger::new(
        // %{r}a over %a to record the client's forwarded IP and not the
        // address of the reverse proxy in front of this service
        "%{r}a '%r' %s %b '%{Referer}i' '%{User-Agent}i' %T",
      ))
      .wrap(middleware::Compress::default())
      .wrap(TracingLogger::<DefaultRootSpanBuilder>::new())
      .app_data(Data::new(context.clone()))
      .wrap(SessionMiddleware::new(context.clone()))
      .configure(api_routes::config)
  })
  .bind(bind)?
  .run()
  .await?;

  Ok(())
}
