use crate::domain::leaderboard::Leaderboard;
use std::collections::HashSet;

/// For each board, the names that appear in no other board.
pub fn exclusive_names(boards: &[Leaderboard]) -> Vec<HashSet<String>> {
    let sets: Vec<HashSet<&str>> = boards
        .iter()
        .map(|b| b.entries.iter().map(|e| e.name.as_str()).collect())
        .collect();

    sets.iter()
        .enumerate()
        .map(|(i, own)| {
            own.iter()
                .filter(|name| {
                    !sets
                        .iter()
                        .enumerate()
                        .any(|(j, other)| j != i && other.contains(*name))
                })
                .map(|name| name.to_string())
                .collect()
        })
        .collect()
}
