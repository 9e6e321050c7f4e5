use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem};

/// Remove quotes from configuration strings.
pub trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    /// Call this method to remove quotes around a configuration value.
    ///
    /// The value is trimmed first. If it is wrapped in a matching pair of
    /// double (`"`) or single (`'`) quotes, the pair is removed. Values
    /// without surrounding quotes are kept as they are.
    ///
    /// ## Example
    ///
    /// ```rust
    /// # use justconfig::Config;
    /// # use justconfig::ConfPath;
    /// # use justconfig::item::ValueExtractor;
    /// # use justconfig::sources::defaults::Defaults;
    /// # use encore::config_processors::Unquote;
    /// #
    /// # let mut conf = Config::default();
    /// # let mut defaults = Defaults::default();
    /// defaults.set(conf.root().push_all(&["quoted"]), "\"abc\"", "source info");
    /// conf.add_source(defaults);
    ///
    /// let value: String = conf.get(ConfPath::from(&["quoted"])).unquote().value().unwrap();
    ///
    /// assert_eq!(value, "abc");
    /// ```
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|v| {
            let v = v.trim();

            let quoted = (v.starts_with('"') && v.ends_with('"') && v.len() >= 2)
                || (v.starts_with('\'') && v.ends_with('\'') && v.len() >= 2);
            if quoted {
                MapAction::Replace(vec![v[1..v.len() - 1].to_owned()])
            } else {
                MapAction::Keep
            }
        })
    }
}

#[cfg(test)]
mod config_processors_test {
    use super::*;
    use justconfig::item::ValueExtractor;
    use justconfig::sources::defaults::Defaults;
    use justconfig::{ConfPath, Config};

    fn single_value_config(value: &str) -> Config {
        let mut conf = Config::default();
        let mut defaults = Defaults::default();
        defaults.set(conf.root().push_all(&["key"]), value, "unittest");
        conf.add_source(defaults);
        conf
    }

    #[test]
    fn should_strip_double_quotes() {
        let conf = single_value_config("\"/data/events.txt\"");
        let value: String = conf.get(ConfPath::from(&["key"])).unquote().value().unwrap();
        assert_eq!("/data/events.txt", value);
    }

    #[test]
    fn should_strip_single_quotes() {
        let conf = single_value_config("'/data/events.txt'");
        let value: String = conf.get(ConfPath::from(&["key"])).unquote().value().unwrap();
        assert_eq!("/data/events.txt", value);
    }

    #[test]
    fn should_keep_unquoted_values() {
        let conf = single_value_config("/data/events.txt");
        let value: String = conf.get(ConfPath::from(&["key"])).unquote().value().unwrap();
        assert_eq!("/data/events.txt", value);
    }
}
