use envconfig::Envconfig;
use lazy_static::lazy_static;

#[derive(Debug, Envconfig)]
pub struct Config {
    #[envconfig(from = "EVCONV_LOG_LEVEL", default = "info")]
    pub log_level: String,
    /// Name of the collection the binary events file is written under.
    #[envconfig(from = "EVCONV_COLLECTION", default = "Events")]
    pub collection: String,
    /// Number of sample values echoed per field when inspecting output.
    #[envconfig(from = "EVCONV_SAMPLE_ROWS", default = "5")]
    pub sample_rows: usize,
    /// Number of column names listed before eliding the remainder.
    #[envconfig(from = "EVCONV_COLUMN_PREVIEW", default = "10")]
    pub column_preview: usize,
}

impl Config {
    pub fn init() -> Config {
        Config::init_from_env().expect("Failed to load config")
    }
}

lazy_static! {
    pub static ref CONFIG: Config = Config::init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        let config = Config::init();
        assert_eq!(config.collection, "Events");
        assert_eq!(config.sample_rows, 5);
        assert_eq!(config.column_preview, 10);
    }
}
