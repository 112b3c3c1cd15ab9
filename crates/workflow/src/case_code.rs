use chrono::{DateTime, Datelike, TimeZone, Utc};
use diesel_async::scoped_futures::ScopedFutureExt;
use procura_db_schema::{
  newtypes::LocalUserId,
  source::procurement_case::{ProcurementCase, ProcurementCaseInsertForm},
  utils::{get_conn, DbPool},
};
use procura_utils::error::{ProcuraErrorType, ProcuraResult};
use tracing::info;

/// How often the boundary retries a lost case-code race before giving up.
pub const MAX_CASE_CODE_ATTEMPTS: u32 = 3;

pub fn format_case_code(year: i32, seq: i64) -> String {
  format!("PROC-{year}-{seq:06}")
}

fn year_bounds(year: i32) -> ProcuraResult<(DateTime<Utc>, DateTime<Utc>)> {
  let start = Utc
    .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
    .single()
    .ok_or_else(|| ProcuraErrorType::InvalidField(format!("bad year {year}")))?;
  let end = Utc
    .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
    .single()
    .ok_or_else(|| ProcuraErrorType::InvalidField(format!("bad year {year}")))?;
  Ok((start, end))
}

/// Computes the next case code as `1 + count(cases created this year)`,
/// zero-padded to six digits.
///
/// Only meaningful inside the transaction that also inserts the case row.
/// Two transactions may still read the same count and mint the same code;
/// the unique constraint on `case_code` catches the loser, which surfaces as
/// the retryable `DuplicateCaseCode`.
pub async fn generate_case_code(pool: &mut DbPool<'_>) -> ProcuraResult<String> {
  let now = Utc::now();
  let (start, end) = year_bounds(now.year())?;
  let seq = 1 + ProcurementCase::count_created_between(pool, start, end).await?;
  Ok(format_case_code(now.year(), seq))
}

/// One attempt at creating a case: count, format, insert, all in one
/// transaction. The caller retries on `DuplicateCaseCode`.
pub async fn create_case(
  pool: &mut DbPool<'_>,
  created_by: LocalUserId,
) -> ProcuraResult<ProcurementCase> {
  let conn = &mut get_conn(pool).await?;
  let case = conn
    .run_transaction(|conn| {
      async move {
        let case_code = generate_case_code(&mut conn.into()).await?;
        let form = ProcurementCaseInsertForm::new(case_code, created_by);
        ProcurementCase::create(&mut conn.into(), &form).await
      }
      .scope_boxed()
    })
    .await?;

  info!("Created case {}", case.case_code);
  Ok(case)
}

#[cfg(test)]
mod tests {
  use super::*;
  use diesel_async::RunQueryDsl;
  use pretty_assertions::assert_eq;
  use procura_db_schema::{
    test_data::TestData,
    utils::{build_db_pool_for_tests, get_conn},
  };
  use procura_db_schema_file::schema::procurement_case;
  use serial_test::serial;

  #[test]
  fn formats_with_six_digit_padding() {
    assert_eq!("PROC-2024-000001", format_case_code(2024, 1));
    assert_eq!("PROC-2024-000042", format_case_code(2024, 42));
    assert_eq!("PROC-2024-123456", format_case_code(2024, 123_456));
    // Lexicographic order matches numeric order within a year
    assert!(format_case_code(2024, 2) < format_case_code(2024, 10));
  }

  #[tokio::test]
  #[serial]
  async fn sequential_codes_have_no_gaps() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;

    // Start from an empty table so the expected sequence is deterministic
    {
      let conn = &mut get_conn(pool).await?;
      diesel::delete(procurement_case::table).execute(conn).await?;
    }

    let year = Utc::now().year();
    let first = create_case(pool, data.carol.id).await?;
    assert_eq!(format_case_code(year, 1), first.case_code);
    let second = create_case(pool, data.carol.id).await?;
    assert_eq!(format_case_code(year, 2), second.case_code);
    let third = create_case(pool, data.carol.id).await?;
    assert_eq!(format_case_code(year, 3), third.case_code);

    data.delete(pool).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn duplicate_codes_are_classified_retryable() -> ProcuraResult<()> {
    let pool = &build_db_pool_for_tests();
    let pool = &mut pool.into();
    let data = TestData::create(pool).await?;

    {
      let conn = &mut get_conn(pool).await?;
      diesel::delete(procurement_case::table).execute(conn).await?;
    }

    let first = create_case(pool, data.carol.id).await?;

    // Insert the code a racing transaction would mint next
    let form = ProcurementCaseInsertForm::new(first.case_code.clone(), data.carol.id);
    let err = match ProcurementCase::create(pool, &form).await {
      Ok(_) => panic!("duplicate case code must not insert"),
      Err(e) => e,
    };
    assert_eq!(ProcuraErrorType::DuplicateCaseCode, err.error_type);
    assert!(err.is_retryable());

    data.delete(pool).await?;
    Ok(())
  }
}
