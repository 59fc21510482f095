/// An entity whose display order is an integer rank within some scope.
///
/// Tasks are ranked by `order_index` within a column, columns by `position`
/// within a project. Ranks are non-negative and dense (`0..N-1`) once an
/// operation completes.
pub trait Ranked {
    type Id: Copy + Eq;

    fn rank_id(&self) -> Self::Id;
    fn rank(&self) -> i32;
    fn set_rank(&mut self, rank: i32);
}
