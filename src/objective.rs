use crate::error::Result;
use crate::evaluation::Evaluator;
use crate::interactions::Interaction;
use crate::model::TrainModel;

// objective function
pub fn objective<T>(
    models: &T,
    evaluator: &Evaluator,
    training_data: &[Interaction],
    held_out_data: &[Interaction],
    rank: usize,
    training_seed: u64,
) -> Result<f64>
where
    T: TrainModel,
    T::Model: Sync,
{
    let model = models.train(training_data, rank, training_seed)?;

    Ok(evaluator.mean_overlap(&model, held_out_data))
}

#[cfg(test)]
mod objective_test {
    use super::*;
    use crate::aliases::ArtistAliases;
    use crate::interactions::InteractionSet;
    use crate::io::{ArtistId, UserId};
    use crate::model::ScoringModel;
    use float_cmp::approx_eq;

    struct RankedByArtistId;

    impl ScoringModel for RankedByArtistId {
        fn score(&self, _user_id: UserId, artist_id: ArtistId) -> f64 {
            artist_id as f64
        }

        fn knows_user(&self, _user_id: UserId) -> bool {
            true
        }
    }

    struct StubModels;

    impl TrainModel for StubModels {
        type Model = RankedByArtistId;

        fn train(
            &self,
            _training_data: &[Interaction],
            _rank: usize,
            _seed: u64,
        ) -> Result<RankedByArtistId> {
            Ok(RankedByArtistId)
        }
    }

    #[test]
    fn should_evaluate_a_trained_model() {
        let complete_set = InteractionSet::with_aliases(
            vec![(1, 100, 5), (1, 101, 3), (2, 100, 1)],
            &ArtistAliases::empty(),
        );
        let training_data = vec![Interaction::new(1, 100, 5)];
        let held_out_data = vec![Interaction::new(1, 101, 3)];
        let evaluator = Evaluator::new(&complete_set, &training_data);

        let score = objective(&StubModels, &evaluator, &training_data, &held_out_data, 10, 345)
            .unwrap();

        assert!(approx_eq!(f64, 1.0, score, epsilon = 0.0000001));
    }
}
