use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::io::ArtistId;

/// Consolidated artist alias table. The raw data contains misspelled and
/// duplicated artist identities; every duplicate id maps to one canonical id.
///
/// Chains in the raw pairs (A->B, B->C) are flattened during construction so
/// that resolution is always a single lookup and already-canonical ids
/// resolve to themselves.
#[derive(Debug)]
pub struct ArtistAliases {
    canonical_by_duplicate: HashMap<ArtistId, ArtistId>,
}

impl ArtistAliases {
    pub fn empty() -> ArtistAliases {
        ArtistAliases {
            canonical_by_duplicate: HashMap::new(),
        }
    }

    /// Builds the consolidated mapping from raw `(duplicate, canonical)`
    /// pairs. The result is independent of the order the pairs arrive in.
    ///
    /// Two entries for the same duplicate id with different canonical targets
    /// are a data-quality error, as is a set of entries that chains back onto
    /// itself.
    pub fn from_pairs(pairs: &[(ArtistId, ArtistId)]) -> Result<ArtistAliases> {
        let mut pairs = pairs.to_vec();
        pairs.sort_unstable();

        let mut raw: HashMap<ArtistId, ArtistId> = HashMap::with_capacity(pairs.len());
        for (duplicate, canonical) in pairs {
            match raw.get(&duplicate) {
                Some(&existing) if existing != canonical => {
                    return Err(Error::ConflictingAlias {
                        duplicate,
                        first: existing,
                        second: canonical,
                    });
                }
                Some(_) => {}
                None => {
                    raw.insert(duplicate, canonical);
                }
            }
        }

        Self::flatten(raw)
    }

    /// Rewrites every entry to its fixed point so a chain resolves in one
    /// lookup. Self-referential entries are no-ops and dropped.
    fn flatten(raw: HashMap<ArtistId, ArtistId>) -> Result<ArtistAliases> {
        let mut canonical_by_duplicate = HashMap::with_capacity(raw.len());

        for &duplicate in raw.keys() {
            let mut target = raw[&duplicate];
            let mut hops = 0;
            while let Some(&next) = raw.get(&target) {
                if next == target {
                    break;
                }
                target = next;
                hops += 1;
                if hops > raw.len() {
                    return Err(Error::AliasCycle(duplicate));
                }
            }
            if target != duplicate {
                canonical_by_duplicate.insert(duplicate, target);
            }
        }

        Ok(ArtistAliases {
            canonical_by_duplicate,
        })
    }

    /// Resolves an artist id to its canonical identity. Ids without an alias
    /// entry are already canonical, so resolving is idempotent.
    pub fn canonical(&self, artist: ArtistId) -> ArtistId {
        *self.canonical_by_duplicate.get(&artist).unwrap_or(&artist)
    }

    pub fn len(&self) -> usize {
        self.canonical_by_duplicate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_by_duplicate.is_empty()
    }
}
