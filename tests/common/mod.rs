//! In-memory stand-in for the P-Tree FTP server.
#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    io::{self, Write},
    rc::Rc,
    time::Duration,
};

use chrono::naive::NaiveDate;
use himawari_arch::{
    ArchiveFetcher, Credentials, DateRange, HimawariArchError, HourFilter, RemoteArchive,
    RemoteSession,
};
use tempfile::TempDir;

pub const H0330: &str = "NC_H08_20190101_0330_r14_FLDK.02701_02601.nc";
pub const H0430: &str = "NC_H08_20190101_0430_r14_FLDK.02701_02601.nc";
pub const DAY1: &str = "/jma/netcdf/201901/01";
pub const DAY2: &str = "/jma/netcdf/201901/02";

#[derive(Default)]
pub struct State {
    pub dirs: HashMap<String, Vec<(String, Vec<u8>)>>,
    pub cwd: String,
    pub connects: usize,
    pub cwd_calls: Vec<String>,
    pub retrievals: Vec<String>,
    /// The next this-many remote calls time out.
    pub timeouts_left: usize,
    /// Retrieving these writes a few bytes and then fails.
    pub broken_files: HashSet<String>,
    pub reject_login: bool,
}

#[derive(Clone, Default)]
pub struct FakeArchive(pub Rc<RefCell<State>>);

pub struct FakeSession(Rc<RefCell<State>>);

impl FakeArchive {
    pub fn with_dir(self, dir: &str, files: &[&str]) -> Self {
        let entries = files
            .iter()
            .map(|f| (f.to_string(), format!("contents of {}", f).into_bytes()))
            .collect();
        self.0.borrow_mut().dirs.insert(dir.to_owned(), entries);
        self
    }

    pub fn state(&self) -> std::cell::Ref<'_, State> {
        self.0.borrow()
    }
}

impl RemoteArchive for FakeArchive {
    type Session = FakeSession;

    fn connect(&self, _: &Credentials) -> Result<FakeSession, HimawariArchError> {
        let mut state = self.0.borrow_mut();
        if state.reject_login {
            return Err(HimawariArchError::Authentication("530 Login incorrect.".into()));
        }
        state.connects += 1;
        state.cwd = "/".into();
        Ok(FakeSession(Rc::clone(&self.0)))
    }
}

impl FakeSession {
    fn maybe_time_out(&self) -> Result<(), HimawariArchError> {
        let mut state = self.0.borrow_mut();
        if state.timeouts_left > 0 {
            state.timeouts_left -= 1;
            return Err(HimawariArchError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "timed out",
            )));
        }
        Ok(())
    }
}

impl RemoteSession for FakeSession {
    fn change_directory(&mut self, path: &str) -> Result<(), HimawariArchError> {
        self.maybe_time_out()?;
        let mut state = self.0.borrow_mut();
        state.cwd_calls.push(path.to_owned());
        if path != "/" && !state.dirs.contains_key(path) {
            return Err(HimawariArchError::Operation(
                "550 Failed to change directory.".into(),
            ));
        }
        state.cwd = path.to_owned();
        Ok(())
    }

    fn list_files(&mut self) -> Result<Vec<String>, HimawariArchError> {
        self.maybe_time_out()?;
        let state = self.0.borrow();
        let files = state.dirs.get(&state.cwd).cloned().unwrap_or_default();
        Ok(files.into_iter().map(|(name, _)| name).collect())
    }

    fn retrieve_file(
        &mut self,
        file_name: &str,
        dest: &mut dyn Write,
    ) -> Result<u64, HimawariArchError> {
        self.maybe_time_out()?;
        let mut state = self.0.borrow_mut();
        state.retrievals.push(file_name.to_owned());

        if state.broken_files.contains(file_name) {
            dest.write_all(b"trunc")?;
            return Err(HimawariArchError::Operation("426 Transfer aborted.".into()));
        }

        let data = state
            .dirs
            .get(&state.cwd)
            .and_then(|files| files.iter().find(|(name, _)| name == file_name))
            .map(|(_, data)| data.clone())
            .ok_or_else(|| HimawariArchError::Operation("550 No such file.".into()))?;

        dest.write_all(&data)?;
        Ok(data.len() as u64)
    }

    fn quit(&mut self) -> Result<(), HimawariArchError> {
        Ok(())
    }
}

pub fn creds() -> Credentials {
    Credentials {
        user: "someone".into(),
        passwd: "secret".into(),
    }
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn fetcher(
    remote: &FakeArchive,
    start: NaiveDate,
    end: NaiveDate,
    hours: &[&str],
    out: &TempDir,
) -> ArchiveFetcher<FakeArchive> {
    ArchiveFetcher::connect(
        remote.clone(),
        creds(),
        DateRange::new(start, end),
        HourFilter::new(hours).unwrap(),
        out.path(),
    )
    .unwrap()
    .with_retry_pause(Duration::from_millis(0))
}
