use crate::models::{Movie, RankedMovie};

/// Ranks movies that arrive sorted by rating ascending (unrated first).
///
/// The movie at ascending position `i` of `n` gets rank `n - i`, so the best
/// rated movie is rank 1 and unrated movies take the highest rank numbers.
/// Ties are positional: equal ratings still get distinct consecutive ranks.
/// The result is ordered by rank.
pub fn rank(ascending: Vec<Movie>) -> Vec<RankedMovie> {
    let total = ascending.len();
    let mut ranked: Vec<RankedMovie> = ascending
        .into_iter()
        .enumerate()
        .map(|(i, movie)| RankedMovie { rank: total - i, movie })
        .collect();
    ranked.sort_by_key(|r| r.rank);
    ranked
}
