//! Business logic services.

pub mod dispute;
pub mod staff;
pub mod sync;

pub use dispute::{
    DisputeResponse, DisputeService, DisputeStats, RebuttalResponse, StaffUserSummary,
};
pub use staff::StaffService;
pub use sync::{SyncReport, SyncService};
