pub mod org_info;
pub mod record;
pub mod storage_keys;

pub use org_info::{IdentifierKind, OrgInfo, StaffTable, SubsidyTable};
pub use record::{Candidate, PendingCandidate, ResultRecord};
pub use storage_keys::StorageKeys;
