use crate::utils::DbPool;
use procura_utils::error::ProcuraResult;

/// Create / read / update against one table. Rows in this schema are never
/// deleted, so the trait carries no delete.
pub trait Crud: Sized {
  type InsertForm;
  type UpdateForm;
  type IdType;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> ProcuraResult<Self>;

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> ProcuraResult<Self>;

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> ProcuraResult<Self>;
}
