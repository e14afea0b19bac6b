//! Repository traits for relational store operations.

pub mod audios;
pub mod follows;
pub mod members;

pub use audios::AudioRepo;
pub use follows::FollowRepo;
pub use members::MemberRepo;
