use std::convert::TryInto;
use std::ffi::OsStr;
use std::fs::File;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;
use crate::io::UserId;

// Set some default values
const DEFAULT_TRAIN_FRACTION: f64 = 0.4;
const DEFAULT_VALIDATION_FRACTION: f64 = 0.4;
const DEFAULT_TEST_FRACTION: f64 = 0.2;
const DEFAULT_SPLIT_SEED: u64 = 13;
const DEFAULT_RANK_CHOICES: &str = "2 10 20";
const DEFAULT_TRAINING_SEED: u64 = 345;
const DEFAULT_NUM_RECOMMENDATIONS: usize = 5;
const DEFAULT_TARGET_USER: UserId = 1059637;

pub struct AppConfig {
    pub data: DataConfig,
    pub split: SplitConfig,
    pub model: ModelConfig,
    pub eval: EvalConfig,
    pub search: SearchConfig,
}

pub struct DataConfig {
    pub artists_path: String,
    pub aliases_path: String,
    pub events_path: String,
}

pub struct SplitConfig {
    pub train_fraction: f64,
    pub validation_fraction: f64,
    pub test_fraction: f64,
    pub seed: u64,
}

pub struct ModelConfig {
    pub factors_path: String,
    pub rank_choices: String,
    pub training_seed: u64,
}

pub struct EvalConfig {
    pub num_recommendations: usize,
    pub target_user: UserId,
    pub num_workers: usize,
}

pub struct SearchConfig {
    pub save_records: bool,
    pub out_path: String,
}

impl AppConfig {
    pub fn new(config_path: String) -> AppConfig {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path)
                .expect("Loading configuration file failed.");
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "events_path"]),
                OsStr::new("LISTENING_EVENTS"),
            ),
            (
                ConfPath::from(&["eval", "num_workers"]),
                OsStr::new("NUM_WORKERS"),
            ),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    fn parse(conf: justconfig::Config) -> AppConfig {
        AppConfig {
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            split: SplitConfig::parse(&conf, ConfPath::from(&["split"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            eval: EvalConfig::parse(&conf, ConfPath::from(&["eval"])),
            search: SearchConfig::parse(&conf, ConfPath::from(&["search"])),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            artists_path: conf
                .get(path.push("artists_path"))
                .unquote()
                .value()
                .unwrap(),
            aliases_path: conf
                .get(path.push("aliases_path"))
                .unquote()
                .value()
                .unwrap(),
            events_path: conf
                .get(path.push("events_path"))
                .unquote()
                .value()
                .unwrap(),
        }
    }
}

impl SplitConfig {
    fn parse(conf: &Config, path: ConfPath) -> SplitConfig {
        SplitConfig {
            train_fraction: conf
                .get(path.push("train_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TRAIN_FRACTION),
            validation_fraction: conf
                .get(path.push("validation_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_VALIDATION_FRACTION),
            test_fraction: conf
                .get(path.push("test_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TEST_FRACTION),
            seed: conf
                .get(path.push("seed"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_SPLIT_SEED),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            factors_path: conf
                .get(path.push("factors_path"))
                .unquote()
                .value()
                .unwrap(),
            rank_choices: conf
                .get(path.push("rank_choices"))
                .trim()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_RANK_CHOICES)),
            training_seed: conf
                .get(path.push("training_seed"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TRAINING_SEED),
        }
    }

    /// The ranks to evaluate, e.g. `rank_choices = 2 10 20`.
    pub fn parsed_rank_choices(&self) -> Vec<usize> {
        self.rank_choices
            .split_whitespace()
            .map(|token| token.parse().expect("rank_choices must hold numbers"))
            .collect()
    }
}

impl EvalConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvalConfig {
        EvalConfig {
            num_recommendations: conf
                .get(path.push("num_recommendations"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_RECOMMENDATIONS),
            target_user: conf
                .get(path.push("target_user"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TARGET_USER),
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| sys_info::cpu_num().unwrap_or_default().try_into().unwrap()),
        }
    }
}

impl SearchConfig {
    fn parse(conf: &Config, path: ConfPath) -> SearchConfig {
        SearchConfig {
            save_records: conf
                .get(path.push("save_records"))
                .trim()
                .value()
                .unwrap_or(true),
            out_path: conf
                .get(path.push("out_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from("rank_search_results.csv")),
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use justconfig::sources::defaults::Defaults;

    #[test]
    fn should_fall_back_to_defaults() {
        let conf = Config::default();
        let split = SplitConfig::parse(&conf, ConfPath::from(&["split"]));
        assert_eq!(0.4, split.train_fraction);
        assert_eq!(0.4, split.validation_fraction);
        assert_eq!(0.2, split.test_fraction);
        assert_eq!(13, split.seed);

        let model_path = ConfPath::from(&["model"]);
        let mut conf = Config::default();
        let mut defaults = Defaults::default();
        defaults.set(
            conf.root().push_all(&["model", "factors_path"]),
            "/models",
            "unittest",
        );
        conf.add_source(defaults);
        let model = ModelConfig::parse(&conf, model_path);
        assert_eq!(vec![2, 10, 20], model.parsed_rank_choices());
        assert_eq!(345, model.training_seed);
    }

    #[test]
    fn should_parse_configured_values() {
        let mut conf = Config::default();
        let mut defaults = Defaults::default();
        defaults.set(
            conf.root().push_all(&["split", "train_fraction"]),
            "0.6",
            "unittest",
        );
        defaults.set(conf.root().push_all(&["split", "seed"]), "99", "unittest");
        conf.add_source(defaults);

        let split = SplitConfig::parse(&conf, ConfPath::from(&["split"]));
        assert_eq!(0.6, split.train_fraction);
        assert_eq!(99, split.seed);
    }

    #[test]
    fn should_unquote_paths() {
        let mut conf = Config::default();
        let mut defaults = Defaults::default();
        defaults.set(
            conf.root().push_all(&["data", "artists_path"]),
            "\"data/artist_data.txt\"",
            "unittest",
        );
        defaults.set(
            conf.root().push_all(&["data", "aliases_path"]),
            "data/artist_alias.txt",
            "unittest",
        );
        defaults.set(
            conf.root().push_all(&["data", "events_path"]),
            "data/user_artist_data.txt",
            "unittest",
        );
        conf.add_source(defaults);

        let data = DataConfig::parse(&conf, ConfPath::from(&["data"]));
        assert_eq!("data/artist_data.txt", data.artists_path);
        assert_eq!("data/artist_alias.txt", data.aliases_path);
    }
}
