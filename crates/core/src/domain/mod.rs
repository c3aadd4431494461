pub mod horizon;
pub mod leaderboard;
pub mod market;
pub mod symbol;
