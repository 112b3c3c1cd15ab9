use crate::{
  newtypes::ProcurementCaseId,
  source::procurement_case::{ProcurementCase, ProcurementCaseInsertForm},
  utils::{get_conn, DbPool},
};
use chrono::{DateTime, Utc};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use procura_db_schema_file::schema::procurement_case;
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl ProcurementCase {
  /// Cases are immutable after creation, so there is no update form and no
  /// `Crud` impl. A unique violation on the case code converts to
  /// `DuplicateCaseCode` via the error downcast, which the caller treats as
  /// retryable.
  pub async fn create(
    pool: &mut DbPool<'_>,
    form: &ProcurementCaseInsertForm,
  ) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(
      diesel::insert_into(procurement_case::table)
        .values(form)
        .get_result::<Self>(conn)
        .await?,
    )
  }

  pub async fn read(pool: &mut DbPool<'_>, id: ProcurementCaseId) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(procurement_case::table.find(id).first(conn).await?)
  }

  /// Number of cases created inside `[start, end)`. Used by the case code
  /// generator with the bounds of the current calendar year.
  pub async fn count_created_between(
    pool: &mut DbPool<'_>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> ProcuraResult<i64> {
    let conn = &mut get_conn(pool).await?;
    procurement_case::table
      .filter(procurement_case::created_at.ge(start))
      .filter(procurement_case::created_at.lt(end))
      .count()
      .get_result::<i64>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }
}
