use crate::io::ArtistId;

pub mod evaluation_reporter;
pub mod hitrate;
pub mod overlap;
pub mod precision;

pub trait RankingMetric {
    fn add(&mut self, recommendations: &[ArtistId], held_out_artists: &[ArtistId]);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}
