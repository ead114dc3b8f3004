//! Random episode and series selection
//!
//! Selection is a two-stage uniform draw: first a season, then an episode
//! within it. Every season is equally likely regardless of its length, so
//! an episode of a short season is more likely to come up than one of a
//! long season.

use rand::Rng;
use rand::seq::IndexedRandom;

/// A drawn episode, both numbers 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodePick {
    pub season_number: usize,
    pub episode_number: u32,
}

/// Draws a season uniformly, then an episode uniformly within it
///
/// Returns `None` when there are no seasons.
pub fn pick_season_and_episode<R>(season_episode_counts: &[u32], rng: &mut R) -> Option<EpisodePick>
where
    R: Rng + ?Sized,
{
    if season_episode_counts.is_empty() {
        return None;
    }

    let season_number = rng.random_range(1..=season_episode_counts.len());
    let episode_count = season_episode_counts[season_number - 1];
    if episode_count == 0 {
        return None;
    }

    Some(EpisodePick {
        season_number,
        episode_number: rng.random_range(1..=episode_count),
    })
}

/// Picks one title uniformly, or `None` if there are none
pub fn pick_random_title<'a, R>(titles: &'a [String], rng: &mut R) -> Option<&'a str>
where
    R: Rng + ?Sized,
{
    titles.choose(rng).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_counts_yield_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_season_and_episode(&[], &mut rng), None);
    }

    #[test]
    fn test_picks_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let counts = [3, 5];

        for _ in 0..2_000 {
            let pick = pick_season_and_episode(&counts, &mut rng).unwrap();
            assert!((1..=2).contains(&pick.season_number));
            let max = counts[pick.season_number - 1];
            assert!((1..=max).contains(&pick.episode_number));
        }
    }

    #[test]
    fn test_every_episode_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let counts = [2, 1, 3];
        let mut seen = std::collections::HashSet::new();

        for _ in 0..2_000 {
            let pick = pick_season_and_episode(&counts, &mut rng).unwrap();
            seen.insert((pick.season_number, pick.episode_number));
        }

        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_seasons_are_weighted_equally() {
        // One single-episode season against a 99-episode season: the short
        // season must come up about half the time, not 1% of the time.
        let mut rng = StdRng::seed_from_u64(99);
        let counts = [1, 99];
        let draws = 10_000;

        let first_season = (0..draws)
            .filter(|_| {
                pick_season_and_episode(&counts, &mut rng)
                    .unwrap()
                    .season_number
                    == 1
            })
            .count();

        assert!(first_season > 4_000 && first_season < 6_000);
    }

    #[test]
    fn test_pick_random_title() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_random_title(&[], &mut rng), None);

        let titles = vec!["Foo".to_string(), "Bar".to_string()];
        for _ in 0..100 {
            let title = pick_random_title(&titles, &mut rng).unwrap();
            assert!(title == "Foo" || title == "Bar");
        }
    }
}
