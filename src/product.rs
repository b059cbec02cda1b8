use crate::satellite::Satellite;
use chrono::{naive::NaiveDate, naive::NaiveDateTime, Datelike, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// Full disk, 2 km, 10 minute netCDF product as laid out on the P-Tree FTP server.
static FULL_DISK_NC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^NC_(H08|H09)_(\d{8})_(\d{4})_r14_FLDK\.02701_02601\.nc$")
        .expect("Invalid full disk filename regex")
});

const REMOTE_ROOT: &str = "/jma/netcdf";

/// The remote directory holding every file for `date`, e.g. `/jma/netcdf/201901/01`.
pub fn remote_directory(date: NaiveDate) -> String {
    format!(
        "{}/{:04}{:02}/{:02}",
        REMOTE_ROOT,
        date.year(),
        date.month(),
        date.day()
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteFile {
    name: String,
    satellite: Satellite,
    scan_start: NaiveDateTime,
}

impl RemoteFile {
    /// Returns `None` for anything that isn't a full disk netCDF file name.
    pub fn parse(name: &str) -> Option<Self> {
        let caps = FULL_DISK_NC_RE.captures(name)?;

        let satellite: Satellite = caps[1].parse().ok()?;
        let stamp = format!("{}{}", &caps[2], &caps[3]);
        let scan_start = NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M").ok()?;

        Some(RemoteFile {
            name: name.to_owned(),
            satellite,
            scan_start,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn satellite(&self) -> Satellite {
        self.satellite
    }

    pub fn scan_start(&self) -> NaiveDateTime {
        self.scan_start
    }

    pub fn hour(&self) -> u32 {
        self.scan_start.hour()
    }
}
