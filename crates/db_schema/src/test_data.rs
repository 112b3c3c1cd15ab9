use crate::{
  source::{
    local_user::{LocalUser, LocalUserInsertForm},
    role::{Role, RoleInsertForm, RoleMember, RoleMemberForm},
  },
  traits::Crud,
  utils::{get_conn, DbPool},
};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use procura_db_schema_file::schema::{local_user, role};
use procura_utils::error::ProcuraResult;

const TEST_USER_NAMES: [&str; 4] = ["test_admin", "test_alice", "test_bob", "test_carol"];
const TEST_ROLE_CODES: [&str; 2] = ["KPA", "PPK"];

/// Users and roles shared by the workflow tests: an admin, `alice` in KPA,
/// `bob` in KPA and PPK, and `carol` with no roles.
pub struct TestData {
  pub admin: LocalUser,
  pub alice: LocalUser,
  pub bob: LocalUser,
  pub carol: LocalUser,
  pub kpa: Role,
  pub ppk: Role,
}

impl TestData {
  pub async fn create(pool: &mut DbPool<'_>) -> ProcuraResult<Self> {
    // Leftovers from an aborted run would collide on the unique columns
    Self::purge(pool).await?;

    let admin = LocalUser::create(
      pool,
      &LocalUserInsertForm {
        admin: Some(true),
        ..LocalUserInsertForm::test_form("test_admin")
      },
    )
    .await?;
    let alice = LocalUser::create(pool, &LocalUserInsertForm::test_form("test_alice")).await?;
    let bob = LocalUser::create(pool, &LocalUserInsertForm::test_form("test_bob")).await?;
    let carol = LocalUser::create(pool, &LocalUserInsertForm::test_form("test_carol")).await?;

    let kpa = Role::create(pool, &RoleInsertForm::new("KPA".into(), "Procurement lead".into()))
      .await?;
    let ppk = Role::create(pool, &RoleInsertForm::new("PPK".into(), "Budget officer".into()))
      .await?;

    RoleMember::join(pool, &RoleMemberForm::new(kpa.id, alice.id)).await?;
    RoleMember::join(pool, &RoleMemberForm::new(kpa.id, bob.id)).await?;
    RoleMember::join(pool, &RoleMemberForm::new(ppk.id, bob.id)).await?;

    Ok(Self {
      admin,
      alice,
      bob,
      carol,
      kpa,
      ppk,
    })
  }

  pub async fn delete(self, pool: &mut DbPool<'_>) -> ProcuraResult<()> {
    Self::purge(pool).await
  }

  async fn purge(pool: &mut DbPool<'_>) -> ProcuraResult<()> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(role::table.filter(role::code.eq_any(TEST_ROLE_CODES)))
      .execute(conn)
      .await?;
    diesel::delete(local_user::table.filter(local_user::name.eq_any(TEST_USER_NAMES)))
      .execute(conn)
      .await?;
    Ok(())
  }
}
