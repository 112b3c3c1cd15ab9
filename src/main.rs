use procura_server::start_procura_server;
use procura_utils::error::ProcuraResult;

#[actix_web::main]
async fn main() -> ProcuraResult<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  start_procura_server().await
}
