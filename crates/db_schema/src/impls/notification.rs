use crate::{
  newtypes::NotificationId,
  source::notification::{Notification, NotificationInsertForm, NotificationUpdateForm},
  traits::Crud,
  utils::{get_conn, DbPool},
};
use chrono::Utc;
use diesel::QueryDsl;
use diesel_async::RunQueryDsl;
use procura_db_schema_file::schema::notification;
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl Crud for Notification {
  type InsertForm = NotificationInsertForm;
  type UpdateForm = NotificationUpdateForm;
  type IdType = NotificationId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(notification::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntCreateNotification)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(notification::table.find(id).first(conn).await?)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(notification::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::CouldntUpdateNotification)
  }
}

impl Notification {
  pub async fn mark_read(pool: &mut DbPool<'_>, id: NotificationId) -> ProcuraResult<Self> {
    let form = NotificationUpdateForm {
      read_at: Some(Some(Utc::now())),
      ..Default::default()
    };
    Self::update(pool, id, &form).await
  }

  pub async fn mark_archived(pool: &mut DbPool<'_>, id: NotificationId) -> ProcuraResult<Self> {
    let form = NotificationUpdateForm {
      archived_at: Some(Some(Utc::now())),
      ..Default::default()
    };
    Self::update(pool, id, &form).await
  }
}
