use rayon::iter::ParallelBridge;
use rayon::prelude::ParallelIterator;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Error, Result};

pub type UserId = u32;
pub type ArtistId = u64;
pub type PlayCount = u64;

/// Reads the artist catalog file: `artist_id name...` per line, whitespace
/// delimited. The name keeps its interior spacing (normalized to single
/// spaces). Blank lines are ignored.
pub fn read_artist_catalog(path: &str) -> Result<Vec<(ArtistId, String)>> {
    let lines = create_buffered_line_reader(path)?;
    lines
        .par_bridge()
        .map(|result| result.map_err(Error::from))
        .filter_map(|result| match result {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_catalog_record(path, &line)),
            Err(e) => Some(Err(e)),
        })
        .collect()
}

/// Reads the alias table: `duplicate_id<TAB>canonical_id` per line. Blank
/// lines are ignored.
pub fn read_artist_aliases(path: &str) -> Result<Vec<(ArtistId, ArtistId)>> {
    let lines = create_buffered_line_reader(path)?;
    lines
        .par_bridge()
        .map(|result| result.map_err(Error::from))
        .filter_map(|result| match result {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_alias_record(path, &line)),
            Err(e) => Some(Err(e)),
        })
        .collect()
}

/// Reads the listening events file: `user_id artist_id play_count` per line,
/// whitespace delimited. Blank lines are ignored. Artist ids are raw here;
/// canonicalization happens when the rows enter the interaction store.
pub fn read_listening_events(path: &str) -> Result<Vec<(UserId, ArtistId, PlayCount)>> {
    let lines = create_buffered_line_reader(path)?;
    lines
        .par_bridge()
        .map(|result| result.map_err(Error::from))
        .filter_map(|result| match result {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_event_record(path, &line)),
            Err(e) => Some(Err(e)),
        })
        .collect()
}

pub(crate) fn create_buffered_line_reader<P>(
    filename: P,
) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

pub(crate) fn malformed(path: &str, record: &str) -> Error {
    Error::MalformedRecord {
        path: path.to_string(),
        record: record.to_string(),
    }
}

fn parse_catalog_record(path: &str, line: &str) -> Result<(ArtistId, String)> {
    let mut fields = line.split_whitespace();
    let artist_id = fields
        .next()
        .and_then(|raw| raw.parse::<ArtistId>().ok())
        .ok_or_else(|| malformed(path, line))?;
    let name = fields.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(malformed(path, line));
    }
    Ok((artist_id, name))
}

fn parse_alias_record(path: &str, line: &str) -> Result<(ArtistId, ArtistId)> {
    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        [duplicate, canonical] => {
            let duplicate = duplicate
                .trim()
                .parse::<ArtistId>()
                .map_err(|_| malformed(path, line))?;
            let canonical = canonical
                .trim()
                .parse::<ArtistId>()
                .map_err(|_| malformed(path, line))?;
            Ok((duplicate, canonical))
        }
        _ => Err(malformed(path, line)),
    }
}

fn parse_event_record(path: &str, line: &str) -> Result<(UserId, ArtistId, PlayCount)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [user, artist, plays] => {
            let user = user.parse::<UserId>().map_err(|_| malformed(path, line))?;
            let artist = artist
                .parse::<ArtistId>()
                .map_err(|_| malformed(path, line))?;
            let plays = plays
                .parse::<PlayCount>()
                .map_err(|_| malformed(path, line))?;
            Ok((user, artist, plays))
        }
        _ => Err(malformed(path, line)),
    }
}
