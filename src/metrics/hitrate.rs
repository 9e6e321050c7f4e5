use crate::io::ArtistId;
use crate::metrics::RankingMetric;

use itertools::Itertools;
use std::cmp;

pub struct HitRate {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl HitRate {
    pub fn new(length: usize) -> HitRate {
        HitRate {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RankingMetric for HitRate {
    fn add(&mut self, recommendations: &[ArtistId], held_out_artists: &[ArtistId]) {
        if held_out_artists.is_empty() {
            return;
        }
        self.qty += 1;
        let top_recos = recommendations
            .iter()
            .take(cmp::min(recommendations.len(), self.length))
            .collect_vec();
        let hit = held_out_artists
            .iter()
            .any(|artist_id| top_recos.contains(&artist_id));
        if hit {
            self.sum_of_scores += 1_f64
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("HitRate@{}", self.length)
    }
}
