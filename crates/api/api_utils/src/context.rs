use procura_db_schema::utils::{ActualDbPool, DbPool};
use procura_utils::settings::{Settings, SETTINGS};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProcuraContext {
  // Wrap pool in Arc to avoid expensive clones
  pool: Arc<ActualDbPool>,
}

impl ProcuraContext {
  pub fn create(pool: ActualDbPool) -> ProcuraContext {
    ProcuraContext {
      pool: Arc::new(pool),
    }
  }

  pub fn pool(&self) -> DbPool<'_> {
    DbPool::Pool(&self.pool)
  }

  pub fn inner_pool(&self) -> &ActualDbPool {
    &self.pool
  }

  pub fn settings(&self) -> &'static Settings {
    &SETTINGS
  }
}
