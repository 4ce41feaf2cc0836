pub mod role;
pub mod status;
pub mod storage;

pub use role::Role;
pub use status::{ProgressStatus, SubmissionStatus, SubmissionType};
