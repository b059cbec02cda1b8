use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::{
    archive::{DATE_ATTEMPTS, RETRY_PAUSE},
    error::HimawariArchError,
    ftp_remote::{JaxaPTree, FTP_PORT, IDLE_TIMEOUT, PTREE_HOST},
    remote::Credentials,
    selection::{DateRange, HourFilter},
};
use chrono::naive::NaiveDate;
use serde::Deserialize;

/// Everything a run needs, normally read from a TOML file.
///
/// ```toml
/// user = "someone_example.com"
/// passwd = "..."
/// start_date = "2019-01-01"
/// end_date = "2019-01-02"
/// hour_list = ["03", "04", "05"]
/// output_path = "/data/himawari"
/// ```
#[derive(Clone, Deserialize)]
pub struct Config {
    pub user: String,
    pub passwd: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hour_list: Vec<String>,
    pub output_path: PathBuf,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_retry_pause_secs")]
    pub retry_pause_secs: u64,
}

fn default_host() -> String {
    PTREE_HOST.to_owned()
}

fn default_port() -> u16 {
    FTP_PORT
}

fn default_timeout_secs() -> u64 {
    IDLE_TIMEOUT.as_secs()
}

fn default_max_retries() -> usize {
    DATE_ATTEMPTS
}

fn default_retry_pause_secs() -> u64 {
    RETRY_PAUSE.as_secs()
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, HimawariArchError> {
        let content = fs::read_to_string(path).map_err(|err| {
            HimawariArchError::Config(format!("reading {:?}: {}", path, err))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, HimawariArchError> {
        let config: Config = toml::from_str(content)
            .map_err(|err| HimawariArchError::Config(format!("parsing config: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), HimawariArchError> {
        if self.user.is_empty() {
            return Err(HimawariArchError::Config("user must not be empty".into()));
        }

        if self.max_retries == 0 {
            return Err(HimawariArchError::Config("max_retries must be at least 1".into()));
        }

        if self.end_date < self.start_date {
            log::warn!(
                "End before start: start - {} end - {}, no dates to fetch",
                self.start_date,
                self.end_date
            );
        }

        self.hour_filter().map(|_| ())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            user: self.user.clone(),
            passwd: self.passwd.clone(),
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn hour_filter(&self) -> Result<HourFilter, HimawariArchError> {
        HourFilter::new(&self.hour_list)
    }

    pub fn remote(&self) -> JaxaPTree {
        JaxaPTree::new(
            self.host.as_str(),
            self.port,
            Duration::from_secs(self.timeout_secs),
        )
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_secs(self.retry_pause_secs)
    }
}
