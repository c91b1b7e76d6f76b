pub mod orchestrator;
pub mod points;
pub mod resolver;
pub mod squads;
pub mod standings;
pub mod store;

#[cfg(test)]
mod test_support;

pub use orchestrator::{Championship, SweepReport};
pub use points::{PointsScale, SweepFault, TableRow};
pub use standings::StandingRow;
pub use store::{SlotAssignment, TournamentStore};
