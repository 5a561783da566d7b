pub mod analysis;
pub mod fields;
pub mod job;
pub mod resume;

pub use analysis::Analysis;
pub use job::Job;
pub use resume::{Resume, StoredFile};
