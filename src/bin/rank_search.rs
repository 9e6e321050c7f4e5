use encore::aliases::ArtistAliases;
use encore::config::AppConfig;
use encore::evaluation::Evaluator;
use encore::interactions::{InteractionSet, SplitProportions};
use encore::io;
use encore::model::PretrainedFactors;
use encore::objective;

use indicatif::ProgressBar;

use csv::Writer;

fn main() -> anyhow::Result<()> {
    // get params from config file
    let config_path = std::env::args().nth(1).expect("Config file not specified!");
    let config = AppConfig::new(config_path);
    let save_records = config.search.save_records;
    let out_path = config.search.out_path;

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.eval.num_workers)
        .build_global()?;

    let alias_pairs = io::read_artist_aliases(&config.data.aliases_path)?;
    let raw_events = io::read_listening_events(&config.data.events_path)?;

    let aliases = ArtistAliases::from_pairs(&alias_pairs)?;
    let complete_set = InteractionSet::with_aliases(raw_events, &aliases);
    let proportions = SplitProportions::new(
        config.split.train_fraction,
        config.split.validation_fraction,
        config.split.test_fraction,
    )?;
    let split = complete_set.split(proportions, config.split.seed);

    let evaluator = Evaluator::new(&complete_set, &split.train);
    let models = PretrainedFactors::new(&config.model.factors_path);

    // Possible values for the model dimensionality
    let rank_choices = config.model.parsed_rank_choices();

    // Progress bar
    let pb = ProgressBar::new(rank_choices.len() as u64);

    let mut wtr = Writer::from_path(out_path)?;
    if save_records {
        // csv writer for storing all values of the whole procedure
        wtr.write_record(&["iteration", "rank", "TopXOverlap"])?;
    }

    // mutable variables
    let mut iteration = 0;
    let mut best_value = std::f64::NEG_INFINITY;
    let mut best_rank: i64 = -1;

    // exhaustive search over the configured ranks
    for rank in rank_choices {
        // increment progress bar
        pb.inc(1);
        // get the result of the objective function
        // with the current rank on the validation split
        let v = objective::objective(
            &models,
            &evaluator,
            &split.train,
            &split.validation,
            rank,
            config.model.training_seed,
        )?;

        if save_records {
            // Save current values
            wtr.write_record(&[
                (iteration as i32).to_string(),
                rank.to_string(),
                v.to_string(),
            ])?;
        }
        // update current best values
        if v > best_value {
            best_value = v;
            best_rank = rank as i64;
        }
        iteration += 1;

        println!("SEARCH,{},{}", rank, v);
    }

    // print the best rank found
    println!("Best rank: {}", best_rank);
    println!("Best value for the goal metric: {}", best_value);

    wtr.flush()?;

    Ok(())
}
