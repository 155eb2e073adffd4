//! Type definitions for the fitness dashboard

pub mod profile;
pub mod record;
pub mod session;

pub use profile::UserProfile;
pub use record::{bmi, Gender, GenderMatching, WorkoutRecord};
pub use session::{SessionEntry, SessionTotals};
