use std::cmp;
use std::time::Instant;

use dary_heap::OctonaryHeap;
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::interactions::{Interaction, InteractionSet};
use crate::io::{ArtistId, UserId};
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::metrics::overlap::TopXOverlap;
use crate::metrics::RankingMetric;
use crate::model::{ArtistScore, ScoringModel};

/// The ranked recommendations for one held out user, next to the artists
/// the user actually listened to.
#[derive(Debug)]
pub struct RankedUser {
    pub user_id: UserId,
    pub recommended: Vec<ArtistId>,
    pub held_out: Vec<ArtistId>,
    pub duration_micros: f64,
}

/// Measures how well a model recommends unheard artists. For every held out
/// user the candidates are the complete catalog minus the artists the user
/// already has in the training data, so a model is never rewarded for
/// recommending what it was trained on.
pub struct Evaluator {
    catalog: Vec<ArtistId>,
    train_artists_by_user: HashMap<UserId, HashSet<ArtistId>>,
    known_users: HashSet<UserId>,
}

impl Evaluator {
    pub fn new(complete_set: &InteractionSet, training_data: &[Interaction]) -> Evaluator {
        let catalog = complete_set.artist_ids();

        let known_users: HashSet<UserId> = complete_set
            .data()
            .iter()
            .map(|interaction| interaction.user_id)
            .collect();

        let mut train_artists_by_user: HashMap<UserId, HashSet<ArtistId>> = HashMap::new();
        for interaction in training_data.iter() {
            train_artists_by_user
                .entry(interaction.user_id)
                .or_insert_with(HashSet::new)
                .insert(interaction.artist_id);
        }

        Evaluator {
            catalog,
            train_artists_by_user,
            known_users,
        }
    }

    pub fn catalog(&self) -> &[ArtistId] {
        &self.catalog
    }

    /// The artists a recommendation for this user may draw from, ascending.
    /// Users without training data get the complete catalog.
    pub fn candidate_artists(&self, user_id: UserId) -> Result<Vec<ArtistId>> {
        if !self.known_users.contains(&user_id) {
            return Err(Error::UnknownUser(user_id));
        }
        Ok(self.candidates_for(user_id))
    }

    /// The score of the original listening pipeline: the mean over all held
    /// out users of the overlap between the top X recommendations and the X
    /// held out artists.
    pub fn mean_overlap<M>(&self, model: &M, held_out_data: &[Interaction]) -> f64
    where
        M: ScoringModel + Sync,
    {
        let mut metric = TopXOverlap::new();
        for ranked in self.rank_held_out(model, held_out_data, 0).iter() {
            metric.add(&ranked.recommended, &ranked.held_out);
        }
        metric.result()
    }

    /// Feeds every held out user into the reporter, in ascending user order.
    /// Users are ranked up to the reporter's cutoff so the @k columns see
    /// full length lists even when few artists were held out.
    pub fn report<M>(
        &self,
        model: &M,
        held_out_data: &[Interaction],
        reporter: &mut EvaluationReporter,
    ) where
        M: ScoringModel + Sync,
    {
        for ranked in self
            .rank_held_out(model, held_out_data, reporter.get_length())
            .iter()
        {
            reporter.add(&ranked.recommended, &ranked.held_out);
        }
    }

    /// Ranks the candidates of every held out user in parallel. Each user
    /// gets at least `how_many` recommendations, or their held out count
    /// when that is larger. The result is ordered by ascending user id
    /// regardless of worker scheduling.
    pub fn rank_held_out<M>(
        &self,
        model: &M,
        held_out_data: &[Interaction],
        how_many: usize,
    ) -> Vec<RankedUser>
    where
        M: ScoringModel + Sync,
    {
        let grouped = Self::held_out_by_user(held_out_data);

        grouped
            .into_par_iter()
            .map(|(user_id, held_out)| {
                let start = Instant::now();
                let qty_wanted = cmp::max(held_out.len(), how_many);
                let recommended = self.top_artists_for_user(model, user_id, qty_wanted);
                let duration_micros = start.elapsed().as_micros() as f64;
                RankedUser {
                    user_id,
                    recommended,
                    held_out,
                    duration_micros,
                }
            })
            .collect()
    }

    fn candidates_for(&self, user_id: UserId) -> Vec<ArtistId> {
        match self.train_artists_by_user.get(&user_id) {
            Some(train_artists) => self
                .catalog
                .iter()
                .filter(|artist_id| !train_artists.contains(artist_id))
                .copied()
                .collect(),
            None => self.catalog.clone(),
        }
    }

    fn top_artists_for_user<M: ScoringModel>(
        &self,
        model: &M,
        user_id: UserId,
        how_many: usize,
    ) -> Vec<ArtistId> {
        if how_many == 0 {
            return Vec::new();
        }

        let mut top_artists: OctonaryHeap<ArtistScore> = OctonaryHeap::with_capacity(how_many);
        for artist_id in self.candidates_for(user_id) {
            let scored_artist = ArtistScore::new(artist_id, model.score(user_id, artist_id));

            if top_artists.len() < how_many {
                top_artists.push(scored_artist);
            } else {
                let mut bottom = top_artists.peek_mut().unwrap();
                // ordering is reversed, a smaller entry outranks the current bottom
                if scored_artist < *bottom {
                    *bottom = scored_artist;
                }
            }
        }

        top_artists
            .into_sorted_vec()
            .iter()
            .map(|scored| scored.id)
            .collect()
    }

    fn held_out_by_user(held_out_data: &[Interaction]) -> Vec<(UserId, Vec<ArtistId>)> {
        let mut by_user: HashMap<UserId, Vec<ArtistId>> = HashMap::new();
        for interaction in held_out_data.iter() {
            by_user
                .entry(interaction.user_id)
                .or_insert_with(Vec::new)
                .push(interaction.artist_id);
        }

        let mut grouped: Vec<(UserId, Vec<ArtistId>)> = by_user
            .into_iter()
            .map(|(user_id, mut artist_ids)| {
                artist_ids.sort_unstable();
                artist_ids.dedup();
                (user_id, artist_ids)
            })
            .collect();
        grouped.sort_unstable_by_key(|(user_id, _)| *user_id);
        grouped
    }
}
