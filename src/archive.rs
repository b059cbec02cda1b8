use std::{
    fs::{remove_file, File},
    io::{self, BufWriter},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crate::{
    connection::Connection,
    error::HimawariArchError,
    product::remote_directory,
    remote::{Credentials, RemoteArchive},
    selection::{DateRange, HourFilter},
};
use chrono::naive::NaiveDate;

/// Default number of tries for each day's directory.
pub const DATE_ATTEMPTS: usize = 3;
/// Default wait between tries for the same day.
pub const RETRY_PAUSE: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub bytes: u64,
    /// Days that were still failing after the last try.
    pub failed_dates: Vec<NaiveDate>,
}

pub struct ArchiveFetcher<RA: RemoteArchive> {
    conn: Connection<RA>,
    dates: DateRange,
    hours: HourFilter,
    output: PathBuf,
    retry_pause: Duration,
}

impl<RA: RemoteArchive> ArchiveFetcher<RA> {
    /// Logs in immediately. The output directory must already exist.
    pub fn connect<P>(
        remote: RA,
        credentials: Credentials,
        dates: DateRange,
        hours: HourFilter,
        output_path: P,
    ) -> Result<Self, HimawariArchError>
    where
        P: Into<PathBuf>,
    {
        let output = output_path.into();
        if !output.is_dir() {
            return Err(HimawariArchError::Config(format!(
                "output directory {:?} does not exist",
                output
            )));
        }

        let conn = Connection::open(remote, credentials)?;
        log::info!("Connected to archive, saving to: {:?}", &output);

        Ok(ArchiveFetcher {
            conn,
            dates,
            hours,
            output,
            retry_pause: RETRY_PAUSE,
        })
    }

    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    pub fn disconnect(&mut self) {
        self.conn.disconnect();
    }

    /// Walk every date, giving each day up to `max_retries` tries. A day that keeps failing is
    /// logged, recorded in the summary, and skipped.
    pub fn run(&mut self, max_retries: usize) -> RunSummary {
        let mut summary = RunSummary::default();
        let dates: Vec<NaiveDate> = self.dates.iter().collect();

        if self.hours.is_empty() {
            log::warn!("Hour list is empty, nothing will be downloaded.");
        }

        for (i, date) in dates.into_iter().enumerate() {
            log::info!("Date {} ({}/{})", date, i + 1, self.dates.len());

            if !self.fetch_date(date, max_retries, &mut summary) {
                summary.failed_dates.push(date);
            }
        }

        log::info!(
            "Finished: {} downloaded ({} bytes), {} already present, {} dates failed",
            summary.downloaded,
            summary.bytes,
            summary.skipped,
            summary.failed_dates.len()
        );
        for date in &summary.failed_dates {
            log::warn!("Gave up on {}", date);
        }

        summary
    }
}

// Private methods and associated functions.

impl<RA: RemoteArchive> ArchiveFetcher<RA> {
    fn fetch_date(
        &mut self,
        date: NaiveDate,
        max_retries: usize,
        summary: &mut RunSummary,
    ) -> bool {
        let dir = remote_directory(date);

        let mut conn = RootDirGuard::new(&mut self.conn);

        for attempt in 1..=max_retries {
            match Self::fetch_directory(&mut conn, &dir, &self.hours, &self.output, summary) {
                Ok(skipped) => {
                    summary.skipped += skipped;
                    return true;
                }
                Err(err) if attempt < max_retries => {
                    log::warn!(
                        "Error in {}: {}. Retrying ({}/{})...",
                        dir,
                        err,
                        attempt,
                        max_retries
                    );
                    thread::sleep(self.retry_pause);
                }
                Err(err) => {
                    log::error!(
                        "Error in {}: {}. Reached maximum retries ({}). Giving up.",
                        dir,
                        err,
                        max_retries
                    );
                }
            }
        }

        false
    }

    /// One pass over a day's directory. Returns how many wanted files were already on disk.
    fn fetch_directory(
        conn: &mut Connection<RA>,
        dir: &str,
        hours: &HourFilter,
        output: &Path,
        summary: &mut RunSummary,
    ) -> Result<usize, HimawariArchError> {
        conn.change_directory(dir)?;
        let names = conn.list_files()?;

        let wanted = hours.select(&names);
        log::info!("{} of {} files in {} wanted", wanted.len(), names.len(), dir);

        let mut skipped = 0;
        for file in &wanted {
            let local_path = output.join(file.name());

            if local_path.exists() {
                log::debug!("Skipping download for {:?}", local_path);
                skipped += 1;
                continue;
            }

            log::debug!("Downloading {}", file.name());
            let res = conn.retrieve_file(file.name(), || {
                Ok(BufWriter::new(File::create(&local_path)?))
            });

            match res {
                Ok(bytes) => {
                    log::debug!("Saved {:?} ({} bytes)", local_path, bytes);
                    summary.downloaded += 1;
                    summary.bytes += bytes;
                }
                Err(err) => {
                    Self::remove_partial(&local_path);
                    return Err(err);
                }
            }
        }

        Ok(skipped)
    }

    fn remove_partial(pth: &Path) {
        match remove_file(pth) {
            Ok(()) => log::debug!("Removed partial file {:?}", pth),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log::error!("Error removing partial file: {:?} : {}", pth, err),
        }
    }
}

/// Puts the session back at `/` when a day's work is over, however it ended.
struct RootDirGuard<'a, RA: RemoteArchive> {
    conn: &'a mut Connection<RA>,
}

impl<'a, RA: RemoteArchive> RootDirGuard<'a, RA> {
    fn new(conn: &'a mut Connection<RA>) -> Self {
        RootDirGuard { conn }
    }
}

impl<'a, RA: RemoteArchive> Deref for RootDirGuard<'a, RA> {
    type Target = Connection<RA>;

    fn deref(&self) -> &Connection<RA> {
        &*self.conn
    }
}

impl<'a, RA: RemoteArchive> DerefMut for RootDirGuard<'a, RA> {
    fn deref_mut(&mut self) -> &mut Connection<RA> {
        &mut *self.conn
    }
}

impl<'a, RA: RemoteArchive> Drop for RootDirGuard<'a, RA> {
    fn drop(&mut self) {
        if let Err(err) = self.conn.change_directory("/") {
            log::error!("Error returning to /: {}", err);
        }
    }
}
