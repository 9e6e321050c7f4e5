use crate::io::ArtistId;
use crate::metrics::RankingMetric;
use std::cmp;
use std::collections::HashSet;

pub struct TopXOverlap {
    sum_of_scores: f64,
    qty: usize,
}

impl TopXOverlap {
    /// Returns a TopXOverlap evaluation metric.
    /// For each user it compares the top X recommendations against the X
    /// artists the user actually listened to in the held out data, where X
    /// is the per user amount of held out artists. Users without held out
    /// artists are left out of the average.
    pub fn new() -> TopXOverlap {
        TopXOverlap {
            sum_of_scores: 0_f64,
            qty: 0,
        }
    }
}

impl Default for TopXOverlap {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingMetric for TopXOverlap {
    fn add(&mut self, recommendations: &[ArtistId], held_out_artists: &[ArtistId]) {
        let how_many = held_out_artists.len();
        if how_many == 0 {
            return;
        }
        self.qty += 1;
        let top_recos: HashSet<&ArtistId> = recommendations
            .iter()
            .take(cmp::min(recommendations.len(), how_many))
            .collect();

        let held_out: HashSet<&ArtistId> = held_out_artists.iter().collect();

        let intersection = top_recos.intersection(&held_out);

        self.sum_of_scores += intersection.count() as f64 / how_many as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "TopXOverlap".to_string()
    }
}

#[cfg(test)]
mod overlap_test {
    use super::*;

    #[test]
    fn should_calculate_overlap() {
        let mut mymetric = TopXOverlap::new();
        let recommendations: Vec<u64> = vec![100, 101, 102];
        let held_out_artists: Vec<u64> = vec![101, 999];
        mymetric.add(&recommendations, &held_out_artists);
        assert_eq!(0.5, mymetric.result());
        assert_eq!("TopXOverlap", mymetric.get_name());
    }

    #[test]
    fn should_score_perfect_recommendations_as_one() {
        let mut mymetric = TopXOverlap::new();
        mymetric.add(&[101], &[101]);
        assert_eq!(1.0, mymetric.result());
    }

    #[test]
    fn should_only_consider_the_first_x_recommendations() {
        let mut mymetric = TopXOverlap::new();
        // 999 is recommended below position X=1 and must not count
        mymetric.add(&[100, 999], &[999]);
        assert_eq!(0.0, mymetric.result());
    }

    #[test]
    fn should_average_across_users() {
        let mut mymetric = TopXOverlap::new();
        mymetric.add(&[100, 101], &[100, 101]);
        mymetric.add(&[100, 101], &[999, 998]);
        assert_eq!(0.5, mymetric.result());
    }

    #[test]
    fn should_skip_users_without_held_out_artists() {
        let mut mymetric = TopXOverlap::new();
        mymetric.add(&[100], &[]);
        mymetric.add(&[100], &[100]);
        assert_eq!(1.0, mymetric.result());
    }

    #[test]
    fn should_handle_divide_by_zero() {
        let undertest = TopXOverlap::new();
        assert!((0.0 - undertest.result()).abs() < f64::EPSILON);
    }
}
