use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::str::FromStr;

use hashbrown::HashMap;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::interactions::Interaction;
use crate::io::{create_buffered_line_reader, malformed, ArtistId, UserId};

/// Scores a (user, artist) pair. Higher means a stronger recommendation.
/// Implementations must score any artist id, including artists the model
/// never saw, so callers can rank the complete catalog.
pub trait ScoringModel {
    fn score(&self, user_id: UserId, artist_id: ArtistId) -> f64;

    fn knows_user(&self, user_id: UserId) -> bool;
}

#[derive(PartialEq, Debug)]
pub struct ArtistScore {
    pub id: ArtistId,
    pub score: f64,
}

impl ArtistScore {
    pub(crate) fn new(id: ArtistId, score: f64) -> Self {
        ArtistScore { id, score }
    }
}

impl Eq for ArtistScore {}

impl Ord for ArtistScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score, equal scores resolved by ascending id
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Less) => Ordering::Greater,
            Some(Ordering::Greater) => Ordering::Less,
            _ => self.id.cmp(&other.id),
        }
    }
}

impl PartialOrd for ArtistScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Scores every candidate for the user and keeps the `how_many` best in a
/// bounded heap. `into_sorted_vec` on the result yields descending score
/// order with ties broken by ascending artist id.
pub fn rank_candidates<M: ScoringModel>(
    model: &M,
    user_id: UserId,
    candidates: &[ArtistId],
    how_many: usize,
) -> BinaryHeap<ArtistScore> {
    let mut top_artists: BinaryHeap<ArtistScore> = BinaryHeap::with_capacity(how_many);
    if how_many == 0 {
        return top_artists;
    }

    for artist_id in candidates.iter() {
        let scored_artist = ArtistScore::new(*artist_id, model.score(user_id, *artist_id));

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
}

/// A latent factor model. The score of a (user, artist) pair is the dot
/// product of their factor vectors. Pairs without factors on either side
/// score zero.
pub struct FactorModel {
    user_factors: HashMap<UserId, Vec<f64>>,
    artist_factors: HashMap<ArtistId, Vec<f64>>,
    rank: usize,
}

impl FactorModel {
    pub fn new(
        user_factors: HashMap<UserId, Vec<f64>>,
        artist_factors: HashMap<ArtistId, Vec<f64>>,
        rank: usize,
    ) -> FactorModel {
        FactorModel {
            user_factors,
            artist_factors,
            rank,
        }
    }

    /// Loads factor files from `model_dir`. Expects `user_factors.txt` and
    /// `artist_factors.txt`, one whitespace separated row per entity: the id
    /// followed by `rank` factor values.
    pub fn load(model_dir: &str) -> Result<FactorModel> {
        let user_path = format!("{}/user_factors.txt", model_dir);
        let artist_path = format!("{}/artist_factors.txt", model_dir);

        let user_rows: Vec<(UserId, Vec<f64>)> = read_factor_rows(&user_path)?;
        let artist_rows: Vec<(ArtistId, Vec<f64>)> = read_factor_rows(&artist_path)?;

        let (user_factors, user_rank) = index_factors(&user_path, user_rows)?;
        let (artist_factors, artist_rank) = index_factors(&artist_path, artist_rows)?;

        let rank = match (user_rank, artist_rank) {
            (Some(users), Some(artists)) if users != artists => {
                return Err(Error::ModelMismatch(format!(
                    "user factors in {} have rank {} but artist factors have rank {}",
                    model_dir, users, artists
                )))
            }
            (Some(users), _) => users,
            (None, Some(artists)) => artists,
            (None, None) => 0,
        };

        Ok(FactorModel {
            user_factors,
            artist_factors,
            rank,
        })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn qty_users(&self) -> usize {
        self.user_factors.len()
    }

    pub fn qty_artists(&self) -> usize {
        self.artist_factors.len()
    }
}

impl ScoringModel for FactorModel {
    fn score(&self, user_id: UserId, artist_id: ArtistId) -> f64 {
        match (
            self.user_factors.get(&user_id),
            self.artist_factors.get(&artist_id),
        ) {
            (Some(user), Some(artist)) => user
                .iter()
                .zip(artist.iter())
                .map(|(user_factor, artist_factor)| user_factor * artist_factor)
                .sum(),
            _ => 0.0,
        }
    }

    fn knows_user(&self, user_id: UserId) -> bool {
        self.user_factors.contains_key(&user_id)
    }
}

/// Produces a scoring model for a training set at a given rank and seed.
pub trait TrainModel {
    type Model: ScoringModel;

    fn train(&self, training_data: &[Interaction], rank: usize, seed: u64) -> Result<Self::Model>;
}

/// Resolves models that were factorized outside this process. Each (rank,
/// seed) combination lives in its own subdirectory of `base_dir`, and a
/// loaded model is rejected unless it covers the training data it claims to
/// be fitted on.
pub struct PretrainedFactors {
    base_dir: String,
}

impl PretrainedFactors {
    pub fn new(base_dir: &str) -> PretrainedFactors {
        PretrainedFactors {
            base_dir: base_dir.to_string(),
        }
    }

    fn model_dir(&self, rank: usize, seed: u64) -> String {
        format!("{}/rank{}-seed{}", self.base_dir, rank, seed)
    }
}

impl TrainModel for PretrainedFactors {
    type Model = FactorModel;

    fn train(&self, training_data: &[Interaction], rank: usize, seed: u64) -> Result<FactorModel> {
        let model_dir = self.model_dir(rank, seed);
        let model = FactorModel::load(&model_dir)?;
        if model.rank() != rank {
            return Err(Error::ModelMismatch(format!(
                "{} holds a rank {} model, expected rank {}",
                model_dir,
                model.rank(),
                rank
            )));
        }
        ensure_covers_training_data(&model, training_data, &model_dir)?;
        Ok(model)
    }
}

fn ensure_covers_training_data(
    model: &FactorModel,
    training_data: &[Interaction],
    model_dir: &str,
) -> Result<()> {
    for interaction in training_data.iter() {
        if !model.user_factors.contains_key(&interaction.user_id) {
            return Err(Error::ModelMismatch(format!(
                "{} has no factors for training user {}",
                model_dir, interaction.user_id
            )));
        }
        if !model.artist_factors.contains_key(&interaction.artist_id) {
            return Err(Error::ModelMismatch(format!(
                "{} has no factors for training artist {}",
                model_dir, interaction.artist_id
            )));
        }
    }
    Ok(())
}

fn read_factor_rows<Id>(path: &str) -> Result<Vec<(Id, Vec<f64>)>>
where
    Id: FromStr + Send,
{
    let reader = create_buffered_line_reader(path)?;
    reader
        .par_bridge()
        .map(|result| result.map_err(Error::from))
        .filter_map(|result| match result {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_factors_record(path, &line)),
            Err(error) => Some(Err(error)),
        })
        .collect()
}

fn parse_factors_record<Id: FromStr>(path: &str, record: &str) -> Result<(Id, Vec<f64>)> {
    let mut tokens = record.split_whitespace();
    let id = match tokens.next().and_then(|token| token.parse::<Id>().ok()) {
        Some(id) => id,
        None => return Err(malformed(path, record)),
    };
    let factors = tokens
        .map(|token| token.parse::<f64>().map_err(|_| malformed(path, record)))
        .collect::<Result<Vec<f64>>>()?;
    if factors.is_empty() {
        return Err(malformed(path, record));
    }
    Ok((id, factors))
}

fn index_factors<Id>(
    path: &str,
    rows: Vec<(Id, Vec<f64>)>,
) -> Result<(HashMap<Id, Vec<f64>>, Option<usize>)>
where
    Id: Eq + std::hash::Hash + std::fmt::Display + Copy,
{
    let mut rank = None;
    let mut factors = HashMap::with_capacity(rows.len());
    for (id, row) in rows {
        match rank {
            None => rank = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(malformed(
                    path,
                    &format!("{} with {} factors, expected {}", id, row.len(), expected),
                ))
            }
            _ => {}
        }
        factors.insert(id, row);
    }
    Ok((factors, rank))
}
