pub mod de;
pub mod partnership;
pub mod stats;
pub mod user;
pub mod workout;

pub use partnership::{
    Direction, InviteResponse, NewPartnership, PartnerLists, Partnership, PartnershipRow,
    PartnershipStatus,
};
pub use stats::{PartnerProfile, PartnerStats, StatsRow};
pub use user::{SessionUser, User};
pub use workout::{Difficulty, Exercise, ExerciseSet, Workout};
