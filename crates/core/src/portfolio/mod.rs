pub mod holdings;
pub mod leaderboard;
pub mod performance;
pub mod snapshot;

pub use holdings::*;
pub use leaderboard::*;
pub use performance::*;
pub use snapshot::*;
