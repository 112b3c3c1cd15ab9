use crate::{
  newtypes::{LocalUserId, RoleId},
  source::role::{Role, RoleInsertForm, RoleMember, RoleMemberForm, RoleUpdateForm},
  traits::Crud,
  utils::{get_conn, DbPool},
};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use procura_db_schema_file::schema::{role, role_member};
use procura_utils::error::{ProcuraErrorExt, ProcuraErrorType, ProcuraResult};

impl Crud for Role {
  type InsertForm = RoleInsertForm;
  type UpdateForm = RoleUpdateForm;
  type IdType = RoleId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(role::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    Ok(role::table.find(id).first(conn).await?)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(role::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }
}

impl RoleMember {
  pub async fn join(pool: &mut DbPool<'_>, form: &RoleMemberForm) -> ProcuraResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(role_member::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  /// The distinct member ids across the given role codes. Unknown codes
  /// simply contribute nothing.
  pub async fn members_of_codes(
    pool: &mut DbPool<'_>,
    codes: &[String],
  ) -> ProcuraResult<Vec<LocalUserId>> {
    let conn = &mut get_conn(pool).await?;
    role_member::table
      .inner_join(role::table)
      .filter(role::code.eq_any(codes))
      .select(role_member::local_user_id)
      .distinct()
      .load::<LocalUserId>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }

  /// The role codes a user belongs to, for notification targeting.
  pub async fn codes_for_user(
    pool: &mut DbPool<'_>,
    local_user_id: LocalUserId,
  ) -> ProcuraResult<Vec<String>> {
    let conn = &mut get_conn(pool).await?;
    role_member::table
      .inner_join(role::table)
      .filter(role_member::local_user_id.eq(local_user_id))
      .select(role::code)
      .load::<String>(conn)
      .await
      .with_procura_type(ProcuraErrorType::DatabaseError)
  }
}
