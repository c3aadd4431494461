pub mod change;
pub mod leaderboard;
