use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::io::ArtistId;

/// Display names for artist ids. Lookup is strict: an id without a catalog
/// entry is an error, never an empty or placeholder name.
pub struct ArtistCatalog {
    name_by_artist: HashMap<ArtistId, String>,
}

impl ArtistCatalog {
    pub fn new(mut entries: Vec<(ArtistId, String)>) -> ArtistCatalog {
        // First entry per id wins; sorting makes that independent of the
        // (parallel) read order.
        entries.sort_unstable();
        let mut name_by_artist = HashMap::with_capacity(entries.len());
        for (artist_id, name) in entries {
            name_by_artist.entry(artist_id).or_insert(name);
        }
        ArtistCatalog { name_by_artist }
    }

    pub fn name(&self, artist: ArtistId) -> Result<&str> {
        self.name_by_artist
            .get(&artist)
            .map(String::as_str)
            .ok_or(Error::UnknownArtist(artist))
    }

    pub fn len(&self) -> usize {
        self.name_by_artist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_by_artist.is_empty()
    }
}
