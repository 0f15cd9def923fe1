//! Database repositories.

mod dispute;
mod rebuttal;
mod staff_user;

pub use dispute::{DisputeRepository, StatusSummary};
pub use rebuttal::RebuttalRepository;
pub use staff_user::StaffUserRepository;
