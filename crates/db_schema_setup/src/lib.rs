use anyhow::Context;
use diesel::{connection::SimpleConnection, Connection, PgConnection};
use diesel_migrations::MigrationHarness;
use tracing::debug;

fn migrations() -> diesel_migrations::EmbeddedMigrations {
  // Using `const` here is required by the borrow checker
  const MIGRATIONS: diesel_migrations::EmbeddedMigrations = diesel_migrations::embed_migrations!();
  MIGRATIONS
}

#[derive(Default, Clone, Copy)]
pub struct Options {
  revert: bool,
  run: bool,
  print_output: bool,
}

impl Options {
  pub fn run(mut self) -> Self {
    self.run = true;
    self
  }

  pub fn revert(mut self) -> Self {
    self.revert = true;
    self
  }

  /// If print_output is true, use println!.
  /// Otherwise, use debug!
  pub fn print_output(mut self) -> Self {
    self.print_output = true;
    self
  }

  fn print(&self, text: &str) {
    if self.print_output {
      println!("{text}");
    } else {
      debug!("{text}");
    }
  }
}

pub fn run(options: Options, db_url: &str) -> anyhow::Result<()> {
  // Migrations don't support async connection, and this function doesn't need to be async
  let mut conn =
    PgConnection::establish(db_url).context("Couldn't connect to the database to run migrations")?;

  // Block concurrent server processes from racing each other through the
  // migration runner until `conn` is closed.
  options.print("Waiting for migration lock...");
  conn.batch_execute("SELECT pg_advisory_lock(0);")?;

  if options.revert {
    options.print("Reverting database migrations...");
    conn
      .revert_all_migrations(migrations())
      .map_err(convert_err)?;
  }

  if options.run {
    options.print("Running database migrations (this may take a while)...");
    conn
      .run_pending_migrations(migrations())
      .map_err(convert_err)?;
  }

  options.print("Database migrations complete.");

  Ok(())
}

/// Makes `diesel::migration::Result` work with `anyhow`
fn convert_err(e: Box<dyn std::error::Error + Send + Sync>) -> anyhow::Error {
  anyhow::anyhow!(e)
}
