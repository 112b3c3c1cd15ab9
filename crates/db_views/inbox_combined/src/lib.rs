pub mod api;
#[cfg(feature = "full")]
mod impls;

/// Read-only aggregation of a user's pending approval tasks and unread
/// notifications. The two sources stay independent queries; their predicates
/// and staleness tolerances differ, so no unified feed is materialized.
pub struct InboxCombinedView;
