use crate::io::ArtistId;
use crate::metrics::RankingMetric;
use std::cmp;
use std::collections::HashSet;

pub struct Precision {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Precision {
    /// Returns a Precision evaluation metric.
    /// Precision quantifies how many of the top `length` recommendations
    /// were actually listened to in the held out data.
    ///
    /// # Arguments
    ///
    /// * `length` - the length aka 'k' that will be used for evaluation.
    ///
    pub fn new(length: usize) -> Precision {
        Precision {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RankingMetric for Precision {
    fn add(&mut self, recommendations: &[ArtistId], held_out_artists: &[ArtistId]) {
        if held_out_artists.is_empty() {
            return;
        }
        self.qty += 1;
        let top_recos: HashSet<&ArtistId> = recommendations
            .iter()
            .take(cmp::min(recommendations.len(), self.length))
            .collect();

        let held_out: HashSet<&ArtistId> = held_out_artists.iter().collect();

        let intersection = top_recos.intersection(&held_out);

        self.sum_of_scores += intersection.count() as f64 / self.length as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Precision@{}", self.length)
    }
}
