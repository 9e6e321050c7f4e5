use num_format::{Locale, ToFormattedString};

use encore::aliases::ArtistAliases;
use encore::catalog::ArtistCatalog;
use encore::config::AppConfig;
use encore::evaluation::Evaluator;
use encore::interactions::{InteractionSet, SplitProportions};
use encore::io;
use encore::metrics::evaluation_reporter::EvaluationReporter;
use encore::model::{PretrainedFactors, TrainModel};
use encore::objective;
use encore::recommend;
use encore::stats;
use encore::stopwatch::Stopwatch;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path);

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.eval.num_workers)
        .build_global()?;

    let catalog_entries = io::read_artist_catalog(&config.data.artists_path)?;
    let alias_pairs = io::read_artist_aliases(&config.data.aliases_path)?;
    let raw_events = io::read_listening_events(&config.data.events_path)?;
    println!(
        "Loaded {} artists, {} alias entries and {} listening events",
        catalog_entries.len().to_formatted_string(&Locale::en),
        alias_pairs.len().to_formatted_string(&Locale::en),
        raw_events.len().to_formatted_string(&Locale::en)
    );

    let catalog = ArtistCatalog::new(catalog_entries);
    let aliases = ArtistAliases::from_pairs(&alias_pairs)?;
    let complete_set = InteractionSet::with_aliases(raw_events, &aliases);

    stats::determine_listening_statistics("canonicalized listening events", complete_set.data());
    for listener in stats::top_listeners(complete_set.data(), 3) {
        println!(
            "User {} has a total play count of {} and a mean play count of {:.0}.",
            listener.user_id, listener.total_plays, listener.mean_plays
        );
    }

    let proportions = SplitProportions::new(
        config.split.train_fraction,
        config.split.validation_fraction,
        config.split.test_fraction,
    )?;
    let split = complete_set.split(proportions, config.split.seed);
    println!(
        "Split {} interactions into {} train / {} validation / {} test",
        complete_set.len().to_formatted_string(&Locale::en),
        split.train.len().to_formatted_string(&Locale::en),
        split.validation.len().to_formatted_string(&Locale::en),
        split.test.len().to_formatted_string(&Locale::en)
    );

    let evaluator = Evaluator::new(&complete_set, &split.train);
    let models = PretrainedFactors::new(&config.model.factors_path);

    let mut best_rank = None;
    let mut best_score = f64::NEG_INFINITY;
    for rank in config.model.parsed_rank_choices() {
        let score = objective::objective(
            &models,
            &evaluator,
            &split.train,
            &split.validation,
            rank,
            config.model.training_seed,
        )?;
        println!("The model score for rank {} is {}", rank, score);
        if score > best_score {
            best_score = score;
            best_rank = Some(rank);
        }
    }
    let best_rank = best_rank.expect("No ranks configured!");
    let best_model = models.train(&split.train, best_rank, config.model.training_seed)?;

    println!("===============================================================");
    println!("===              START EVALUATING TEST SPLIT               ====");
    println!("===============================================================");
    println!("Best rank: {}", best_rank);

    let mut reporter = EvaluationReporter::new(config.eval.num_recommendations);
    let mut stopwatch = Stopwatch::new();
    for ranked in evaluator.rank_held_out(&best_model, &split.test, reporter.get_length()) {
        stopwatch.record(ranked.user_id, ranked.duration_micros);
        reporter.add(&ranked.recommended, &ranked.held_out);
    }
    println!("{}", reporter.get_name());
    println!("{}", reporter.result());
    println!("Qty evaluated users: {}", stopwatch.get_n());
    println!("Prediction latency");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(0.90));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(0.95));
    println!("p99.5 (microseconds): {}", stopwatch.get_percentile_in_micros(0.995));

    let recommendations = recommend::recommend(
        &best_model,
        config.eval.target_user,
        evaluator.catalog(),
        &catalog,
        config.eval.num_recommendations,
    )?;
    println!(
        "Top {} artists for user {}",
        recommendations.len(),
        config.eval.target_user
    );
    for (position, recommendation) in recommendations.iter().enumerate() {
        println!("Artist {}: {}", position, recommendation.name);
    }

    Ok(())
}
