use crate::io::ArtistId;
use crate::metrics::hitrate::HitRate;
use crate::metrics::overlap::TopXOverlap;
use crate::metrics::precision::Precision;
use crate::metrics::RankingMetric;

pub struct EvaluationReporter {
    overlap: TopXOverlap,
    hitrate: HitRate,
    precision: Precision,
    length: usize,
}

impl EvaluationReporter {
    pub fn new(length: usize) -> EvaluationReporter {
        let overlap = TopXOverlap::new();
        let hitrate = HitRate::new(length);
        let precision = Precision::new(length);

        EvaluationReporter {
            overlap,
            hitrate,
            precision,
            length,
        }
    }

    /// The cutoff of the @k columns. Recommendation lists fed to `add`
    /// should hold at least this many entries.
    pub fn get_length(&self) -> usize {
        self.length
    }

    pub fn add(&mut self, recommendations: &[ArtistId], held_out_artists: &[ArtistId]) {
        self.overlap.add(recommendations, held_out_artists);
        self.hitrate.add(recommendations, held_out_artists);
        self.precision.add(recommendations, held_out_artists);
    }

    pub fn result(&self) -> String {
        let overlap_score = format!("{:.4}", self.overlap.result());
        let hitrate_score = format!("{:.4}", self.hitrate.result());
        let precision_score = format!("{:.4}", self.precision.result());
        format!("{},{},{}", overlap_score, hitrate_score, precision_score)
    }

    pub fn get_name(&self) -> String {
        let overlap_name = self.overlap.get_name();
        let hitrate_name = self.hitrate.get_name();
        let precision_name = self.precision.get_name();
        format!("{},{},{}", overlap_name, hitrate_name, precision_name)
    }
}
