use crate::catalog::ArtistCatalog;
use crate::error::{Error, Result};
use crate::io::{ArtistId, UserId};
use crate::model::{rank_candidates, ScoringModel};

/// A ranked artist with its resolved name, ready to present to a user.
#[derive(Debug)]
pub struct Recommendation {
    pub artist_id: ArtistId,
    pub name: String,
    pub score: f64,
}

/// Recommends the `how_many` best scoring artists for the user, with names
/// resolved through the catalog. Fails for users the model has never seen
/// and for artists the catalog cannot name, rather than silently dropping
/// them from the result.
pub fn recommend<M: ScoringModel>(
    model: &M,
    user_id: UserId,
    artist_ids: &[ArtistId],
    catalog: &ArtistCatalog,
    how_many: usize,
) -> Result<Vec<Recommendation>> {
    if !model.knows_user(user_id) {
        return Err(Error::UnknownUser(user_id));
    }

    rank_candidates(model, user_id, artist_ids, how_many)
        .into_sorted_vec()
        .iter()
        .map(|scored| {
            Ok(Recommendation {
                artist_id: scored.id,
                name: catalog.name(scored.id)?.to_string(),
                score: scored.score,
            })
        })
        .collect()
}
