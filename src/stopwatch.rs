use crate::io::UserId;
use crate::stopwatch;
use tdigest::TDigest;

#[derive(Clone)]
pub struct Stopwatch {
    prediction_durations: Vec<UserDurationMicros>,
}

pub type UserDurationMicros = (UserId, f64);

impl Default for stopwatch::Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            prediction_durations: Vec::new(),
        }
    }

    /// Books a duration that was measured elsewhere, e.g. on a worker thread.
    pub fn record(&mut self, user_id: UserId, duration_micros: f64) {
        let tuple: UserDurationMicros = (user_id, duration_micros);
        self.prediction_durations.push(tuple);
    }

    pub fn get_n(&mut self) -> usize {
        self.prediction_durations.len()
    }

    /// Estimated latency percentile in microseconds, `q` in `0.0..=1.0`.
    pub fn get_percentile_in_micros(&mut self, q: f64) -> f64 {
        let t_digest = TDigest::new_with_size(100);
        let durations = self
            .prediction_durations
            .iter()
            .map(|tuple| tuple.1)
            .collect();
        let sorted_digest = t_digest.merge_unsorted(durations);
        sorted_digest.estimate_quantile(q)
    }
}
