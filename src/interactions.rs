use float_cmp::approx_eq;
use hashbrown::HashMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::aliases::ArtistAliases;
use crate::error::{Error, Result};
use crate::io::{ArtistId, PlayCount, UserId};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Interaction {
    pub user_id: UserId,
    pub artist_id: ArtistId,
    pub play_count: PlayCount,
}

impl Interaction {
    pub fn new(user_id: UserId, artist_id: ArtistId, play_count: PlayCount) -> Self {
        Interaction {
            user_id,
            artist_id,
            play_count,
        }
    }
}

/// Target fractions for the train/validation/test partition. Validated on
/// construction so a split can never run with a bad configuration.
#[derive(Clone, Copy, Debug)]
pub struct SplitProportions {
    train: f64,
    validation: f64,
    test: f64,
}

impl SplitProportions {
    pub fn new(train: f64, validation: f64, test: f64) -> Result<SplitProportions> {
        let sum = train + validation + test;
        let non_negative = train >= 0.0 && validation >= 0.0 && test >= 0.0;
        if !non_negative || !approx_eq!(f64, sum, 1.0, epsilon = 0.000001) {
            return Err(Error::InvalidSplitConfig {
                train,
                validation,
                test,
            });
        }
        Ok(SplitProportions {
            train,
            validation,
            test,
        })
    }

    pub fn train(&self) -> f64 {
        self.train
    }

    pub fn validation(&self) -> f64 {
        self.validation
    }

    pub fn test(&self) -> f64 {
        self.test
    }
}

pub struct ThreeWaySplit {
    pub train: Vec<Interaction>,
    pub validation: Vec<Interaction>,
    pub test: Vec<Interaction>,
}

/// The canonicalized interaction store. Construction resolves artist aliases
/// and merges rows that collapse onto the same (user, canonical artist) key
/// by summing their play counts, so an artist listened to under two ids is
/// never counted twice.
pub struct InteractionSet {
    interactions: Vec<Interaction>,
}

impl InteractionSet {
    pub fn with_aliases(
        raw: Vec<(UserId, ArtistId, PlayCount)>,
        aliases: &ArtistAliases,
    ) -> InteractionSet {
        let mut merged: HashMap<(UserId, ArtistId), PlayCount> =
            HashMap::with_capacity(raw.len());
        for (user_id, artist_id, play_count) in raw {
            *merged
                .entry((user_id, aliases.canonical(artist_id)))
                .or_insert(0) += play_count;
        }

        let mut interactions: Vec<Interaction> = merged
            .into_iter()
            .map(|((user_id, artist_id), play_count)| {
                Interaction::new(user_id, artist_id, play_count)
            })
            .collect();
        // Canonical order. Everything downstream (splits, statistics) starts
        // from this ordering, never from the read order of the input file.
        interactions.sort_unstable();

        InteractionSet { interactions }
    }

    pub fn data(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Distinct artist ids across the complete set, ascending. This is the
    /// full catalog the evaluator draws candidates from.
    pub fn artist_ids(&self) -> Vec<ArtistId> {
        let mut artist_ids: Vec<ArtistId> = self
            .interactions
            .iter()
            .map(|interaction| interaction.artist_id)
            .collect();
        artist_ids.sort_unstable();
        artist_ids.dedup();
        artist_ids
    }

    /// Distinct user ids across the complete set, ascending.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut user_ids: Vec<UserId> = self
            .interactions
            .iter()
            .map(|interaction| interaction.user_id)
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        user_ids
    }

    /// Partitions the set into train/validation/test subsets. The subsets are
    /// pairwise disjoint and their union is the complete set. The same seed,
    /// input and proportions always yield the bit-identical partition: the
    /// shuffle starts from canonical order with a Pcg64 stream seeded from
    /// `seed`.
    pub fn split(&self, proportions: SplitProportions, seed: u64) -> ThreeWaySplit {
        let mut shuffled = self.interactions.clone();
        let mut rng = Pcg64::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);

        let qty = shuffled.len() as f64;
        let train_end = (proportions.train * qty).round() as usize;
        let validation_end = train_end + (proportions.validation * qty).round() as usize;
        // Rounding both cuts independently can overshoot the tail by one.
        let validation_end = validation_end.min(shuffled.len());
        let train_end = train_end.min(validation_end);

        let test = shuffled.split_off(validation_end);
        let validation = shuffled.split_off(train_end);
        let train = shuffled;

        ThreeWaySplit {
            train,
            validation,
            test,
        }
    }
}

#[cfg(test)]
mod interactions_test {
    use super::*;
    use hashbrown::HashSet;

    fn fixture_rows(qty: u32) -> Vec<(UserId, ArtistId, PlayCount)> {
        (0..qty)
            .map(|i| (i % 7, 1_000_000 + (i as u64 * 13) % 29, 1 + i as u64))
            .collect()
    }

    #[test]
    fn should_canonicalize_and_merge_play_counts() {
        let aliases = ArtistAliases::from_pairs(&[(200, 100)]).unwrap();
        let rows = vec![(1, 100, 3), (1, 200, 5), (2, 200, 1)];
        let interactions = InteractionSet::with_aliases(rows, &aliases);

        assert_eq!(
            vec![Interaction::new(1, 100, 8), Interaction::new(2, 100, 1)],
            interactions.data().to_vec()
        );
        assert_eq!(vec![100], interactions.artist_ids());
        assert_eq!(vec![1, 2], interactions.user_ids());
    }

    #[test]
    fn should_leave_canonical_ids_untouched() {
        let interactions =
            InteractionSet::with_aliases(vec![(1, 100, 5), (1, 101, 3)], &ArtistAliases::empty());
        assert_eq!(2, interactions.len());
        assert_eq!(vec![100, 101], interactions.artist_ids());
    }

    #[test]
    fn split_should_be_disjoint_and_exhaustive() {
        let interactions = InteractionSet::with_aliases(fixture_rows(50), &ArtistAliases::empty());
        let proportions = SplitProportions::new(0.4, 0.4, 0.2).unwrap();
        let split = interactions.split(proportions, 13);

        let train: HashSet<Interaction> = split.train.iter().copied().collect();
        let validation: HashSet<Interaction> = split.validation.iter().copied().collect();
        let test: HashSet<Interaction> = split.test.iter().copied().collect();

        assert!(train.is_disjoint(&validation));
        assert!(train.is_disjoint(&test));
        assert!(validation.is_disjoint(&test));

        let mut union: Vec<Interaction> = train
            .iter()
            .chain(validation.iter())
            .chain(test.iter())
            .copied()
            .collect();
        union.sort_unstable();
        assert_eq!(interactions.data().to_vec(), union);
    }

    #[test]
    fn split_sizes_should_match_proportions() {
        let interactions = InteractionSet::with_aliases(fixture_rows(50), &ArtistAliases::empty());
        let qty = interactions.len();
        let proportions = SplitProportions::new(0.4, 0.4, 0.2).unwrap();
        let split = interactions.split(proportions, 13);

        assert_eq!((qty as f64 * 0.4).round() as usize, split.train.len());
        assert_eq!((qty as f64 * 0.4).round() as usize, split.validation.len());
        assert_eq!(qty, split.train.len() + split.validation.len() + split.test.len());
    }

    #[test]
    fn same_seed_should_reproduce_the_partition() {
        let interactions = InteractionSet::with_aliases(fixture_rows(40), &ArtistAliases::empty());
        let proportions = SplitProportions::new(0.4, 0.4, 0.2).unwrap();

        let first = interactions.split(proportions, 13);
        let second = interactions.split(proportions, 13);

        assert_eq!(first.train, second.train);
        assert_eq!(first.validation, second.validation);
        assert_eq!(first.test, second.test);
    }

    #[test]
    fn different_seeds_should_produce_different_partitions() {
        let interactions = InteractionSet::with_aliases(fixture_rows(40), &ArtistAliases::empty());
        let proportions = SplitProportions::new(0.4, 0.4, 0.2).unwrap();

        let first: HashSet<Interaction> =
            interactions.split(proportions, 13).train.into_iter().collect();
        let second: HashSet<Interaction> =
            interactions.split(proportions, 14).train.into_iter().collect();

        assert_ne!(first, second);
    }

    #[test]
    fn should_reject_proportions_not_summing_to_one() {
        let err = SplitProportions::new(0.5, 0.4, 0.2).unwrap_err();
        assert!(matches!(err, Error::InvalidSplitConfig { .. }));
    }

    #[test]
    fn should_reject_negative_proportions() {
        assert!(SplitProportions::new(-0.2, 0.6, 0.6).is_err());
    }

    #[test]
    fn should_accept_proportions_within_tolerance() {
        assert!(SplitProportions::new(0.3, 0.3, 0.4000000001).is_ok());
    }

    #[test]
    fn split_of_tiny_set_should_account_for_every_row() {
        let interactions = InteractionSet::with_aliases(
            vec![(1, 100, 5), (1, 101, 3), (2, 100, 1)],
            &ArtistAliases::empty(),
        );
        let proportions = SplitProportions::new(0.4, 0.4, 0.2).unwrap();
        let split = interactions.split(proportions, 13);
        assert_eq!(
            3,
            split.train.len() + split.validation.len() + split.test.len()
        );
    }

    #[test]
    fn split_of_empty_set_should_be_empty() {
        let interactions = InteractionSet::with_aliases(vec![], &ArtistAliases::empty());
        let proportions = SplitProportions::new(0.4, 0.4, 0.2).unwrap();
        let split = interactions.split(proportions, 13);
        assert!(split.train.is_empty());
        assert!(split.validation.is_empty());
        assert!(split.test.is_empty());
    }
}
