pub mod deletion_plan;
pub mod grouper;

pub use deletion_plan::{execute_deletion_plan, DeletionOutcome, DeletionStatus, PendingDeletions};
pub use grouper::find_duplicate_groups;
