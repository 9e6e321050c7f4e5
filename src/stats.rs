use hashbrown::HashMap;
use rayon::prelude::*;
use tdigest::TDigest;

use crate::interactions::Interaction;
use crate::io::{ArtistId, PlayCount, UserId};

pub struct ListeningStats {
    pub descriptive_name: String,
    pub qty_records: usize,
    pub qty_unique_user_ids: usize,
    pub qty_unique_artist_ids: usize,
    pub total_plays: PlayCount,
    pub plays_p50: f64,
    pub plays_p90: f64,
    pub plays_p99: f64,
    pub plays_p100: f64,
}

pub struct UserActivity {
    pub user_id: UserId,
    pub total_plays: PlayCount,
    pub qty_interactions: usize,
    pub mean_plays: f64,
}

pub fn determine_listening_statistics(
    descriptive_name: &str,
    interactions: &[Interaction],
) -> ListeningStats {
    let qty_records = interactions.len();

    let mut user_ids: Vec<UserId> = interactions
        .into_par_iter()
        .map(|interaction| interaction.user_id)
        .collect();
    user_ids.par_sort_unstable();
    user_ids.dedup();
    let qty_unique_user_ids = user_ids.len();

    let mut artist_ids: Vec<ArtistId> = interactions
        .into_par_iter()
        .map(|interaction| interaction.artist_id)
        .collect();
    artist_ids.par_sort_unstable();
    artist_ids.dedup();
    let qty_unique_artist_ids = artist_ids.len();

    let total_plays: PlayCount = interactions
        .par_iter()
        .map(|interaction| interaction.play_count)
        .sum();

    let t_digest = TDigest::new_with_size(100);
    let play_counts = interactions
        .iter()
        .map(|interaction| interaction.play_count as f64)
        .collect();
    let sorted_digest = t_digest.merge_unsorted(play_counts);
    let plays_p50 = sorted_digest.estimate_quantile(0.50);
    let plays_p90 = sorted_digest.estimate_quantile(0.90);
    let plays_p99 = sorted_digest.estimate_quantile(0.99);
    let plays_p100 = sorted_digest.estimate_quantile(1.0);

    println!("Loaded {}", descriptive_name);
    println!("\tEvents: {}", qty_records);
    println!("\tUsers: {}", qty_unique_user_ids);
    println!("\tArtists: {}", qty_unique_artist_ids);
    println!("\tTotal plays: {}", total_plays);
    print!("\tPlay count percentiles: ");
    print!(" p50={}", plays_p50);
    print!(" p90={}", plays_p90);
    print!(" p99={}", plays_p99);
    println!(" p100={}", plays_p100);

    ListeningStats {
        descriptive_name: descriptive_name.to_string(),
        qty_records,
        qty_unique_user_ids,
        qty_unique_artist_ids,
        total_plays,
        plays_p50,
        plays_p90,
        plays_p99,
        plays_p100,
    }
}

/// Per user aggregates over the whole set, ordered by total play count
/// descending. Users tied on total plays are ordered by ascending user id.
pub fn user_activities(interactions: &[Interaction]) -> Vec<UserActivity> {
    let mut per_user: HashMap<UserId, (PlayCount, usize)> = HashMap::new();
    for interaction in interactions {
        let entry = per_user.entry(interaction.user_id).or_insert((0, 0));
        entry.0 += interaction.play_count;
        entry.1 += 1;
    }

    let mut listeners: Vec<UserActivity> = per_user
        .into_iter()
        .map(|(user_id, (total_plays, qty_interactions))| UserActivity {
            user_id,
            total_plays,
            qty_interactions,
            mean_plays: total_plays as f64 / qty_interactions as f64,
        })
        .collect();
    listeners.sort_unstable_by(|a, b| {
        b.total_plays
            .cmp(&a.total_plays)
            .then(a.user_id.cmp(&b.user_id))
    });
    listeners
}

/// The heaviest listeners of the set.
pub fn top_listeners(interactions: &[Interaction], how_many: usize) -> Vec<UserActivity> {
    let mut listeners = user_activities(interactions);
    listeners.truncate(how_many);
    listeners
}

#[cfg(test)]
mod stats_test {
    use super::*;
    use float_cmp::approx_eq;

    fn fixture() -> Vec<Interaction> {
        vec![
            Interaction::new(1, 100, 5),
            Interaction::new(1, 101, 3),
            Interaction::new(2, 100, 1),
            Interaction::new(3, 102, 40),
        ]
    }

    #[test]
    fn should_count_records_users_and_artists() {
        let stats = determine_listening_statistics("fixture", &fixture());
        assert_eq!(4, stats.qty_records);
        assert_eq!(3, stats.qty_unique_user_ids);
        assert_eq!(3, stats.qty_unique_artist_ids);
        assert_eq!(49, stats.total_plays);
    }

    #[test]
    fn should_rank_listeners_by_total_plays() {
        let listeners = top_listeners(&fixture(), 2);
        assert_eq!(2, listeners.len());
        assert_eq!(3, listeners[0].user_id);
        assert_eq!(40, listeners[0].total_plays);
        assert_eq!(1, listeners[1].user_id);
        assert_eq!(8, listeners[1].total_plays);
    }

    #[test]
    fn should_compute_mean_plays_per_listener() {
        let listeners = top_listeners(&fixture(), 3);
        let listener = &listeners[1];
        assert_eq!(2, listener.qty_interactions);
        assert!(approx_eq!(f64, 4.0, listener.mean_plays, epsilon = 0.0000001));
    }

    #[test]
    fn should_return_all_listeners_when_asking_for_more() {
        let listeners = top_listeners(&fixture(), 10);
        assert_eq!(3, listeners.len());
    }

    #[test]
    fn should_aggregate_every_user() {
        let activities = user_activities(&fixture());
        let mut user_ids: Vec<UserId> =
            activities.iter().map(|activity| activity.user_id).collect();
        user_ids.sort_unstable();
        assert_eq!(vec![1, 2, 3], user_ids);
    }
}
