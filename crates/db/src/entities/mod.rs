//! Database entities.

pub mod dispute;
pub mod rebuttal;
pub mod staff_user;

pub use dispute::Entity as Dispute;
pub use rebuttal::Entity as Rebuttal;
pub use staff_user::Entity as StaffUser;
