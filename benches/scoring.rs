#[macro_use]
extern crate bencher;
extern crate encore;
extern crate rand;

use bencher::Bencher;
use hashbrown::HashMap;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use encore::io::{ArtistId, UserId};
use encore::model::{rank_candidates, FactorModel, ScoringModel};

benchmark_group!(benches, rank_full_catalog, score_single_pair);
benchmark_main!(benches);

const CATALOG_SIZE: u64 = 50_000;
const RANK: usize = 10;
const HOW_MANY: usize = 25;

fn rank_full_catalog(bench: &mut Bencher) {
    let mut rng = Pcg64::seed_from_u64(42);
    let candidates: Vec<ArtistId> = (0..CATALOG_SIZE).collect();
    let model = random_factor_model(&mut rng, &candidates);

    bench.iter(|| {
        bencher::black_box(rank_candidates(&model, 1, &candidates, HOW_MANY));
    })
}

fn score_single_pair(bench: &mut Bencher) {
    let mut rng = Pcg64::seed_from_u64(42);
    let candidates: Vec<ArtistId> = (0..CATALOG_SIZE).collect();
    let model = random_factor_model(&mut rng, &candidates);

    bench.iter(|| {
        bencher::black_box(model.score(1, CATALOG_SIZE / 2));
    })
}

fn random_factor_model(rng: &mut Pcg64, artist_ids: &[ArtistId]) -> FactorModel {
    let mut user_factors: HashMap<UserId, Vec<f64>> = HashMap::new();
    user_factors.insert(1, random_factors(rng));

    let mut artist_factors: HashMap<ArtistId, Vec<f64>> = HashMap::new();
    for artist_id in artist_ids.iter() {
        artist_factors.insert(*artist_id, random_factors(rng));
    }

    FactorModel::new(user_factors, artist_factors, RANK)
}

fn random_factors(rng: &mut Pcg64) -> Vec<f64> {
    (0..RANK).map(|_| rng.gen_range(-1.0..1.0)).collect()
}
