//! Persistence of the harvested issues document.

pub mod persister;
pub mod repository;

pub use persister::IssuePersister;
pub use repository::IssueRepository;
