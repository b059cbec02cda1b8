use std::{collections::BTreeSet, iter::successors};

use crate::{error::HimawariArchError, product::RemoteFile};
use chrono::naive::NaiveDate;

/// Every calendar day from `start` through `end`, inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    dates: Vec<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let dates = successors(Some(start), |d| d.succ_opt())
            .take_while(|d| *d <= end)
            .collect();

        DateRange { dates }
    }

    /// Parse `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, HimawariArchError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|err| HimawariArchError::Config(format!("bad date {:?}: {}", s, err)))
        };

        Ok(Self::new(parse(start)?, parse(end)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Allow-list of UTC hours, given as two digit strings like `"03"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HourFilter {
    hours: BTreeSet<u32>,
}

impl HourFilter {
    pub fn new<I, S>(hours: I) -> Result<Self, HimawariArchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hours = hours
            .into_iter()
            .map(|h| Self::parse_hour(h.as_ref()))
            .collect::<Result<BTreeSet<u32>, _>>()?;

        Ok(HourFilter { hours })
    }

    fn parse_hour(hour: &str) -> Result<u32, HimawariArchError> {
        let bad = || {
            HimawariArchError::Config(format!("bad hour {:?}, expected \"00\"-\"23\"", hour))
        };

        if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }

        match hour.parse::<u32>() {
            Ok(h) if h < 24 => Ok(h),
            _ => Err(bad()),
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.hours.contains(&hour)
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Parse each listed name and keep the full disk files in an allowed hour, in listing order.
    pub fn select<'a, I>(&self, names: I) -> Vec<RemoteFile>
    where
        I: IntoIterator<Item = &'a String>,
    {
        names
            .into_iter()
            .filter_map(|name| RemoteFile::parse(name))
            .filter(|file| self.contains(file.hour()))
            .collect()
    }
}
