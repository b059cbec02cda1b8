mod common;

use std::sync::Mutex;

use common::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use tempfile::TempDir;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("himawari_arch") {
            RECORDS
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture;

#[test]
fn one_report_per_failed_attempt() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let out = TempDir::new().unwrap();
    let remote = FakeArchive::default().with_dir(DAY2, &[]);

    let summary = fetcher(&remote, ymd(2019, 1, 1), ymd(2019, 1, 2), &["03"], &out).run(3);

    let records = RECORDS.lock().unwrap();
    let retries: Vec<_> = records
        .iter()
        .filter(|(lvl, msg)| *lvl == Level::Warn && msg.contains("Retrying"))
        .collect();
    let give_ups: Vec<_> = records
        .iter()
        .filter(|(lvl, msg)| *lvl == Level::Error && msg.contains("Giving up"))
        .collect();

    assert_eq!(retries.len(), 2);
    assert!(retries[0].1.contains("(1/3)"));
    assert!(retries[1].1.contains("(2/3)"));
    assert_eq!(give_ups.len(), 1);
    assert!(give_ups[0].1.contains(DAY1));

    // The second day still gets processed, and both days end back at `/`.
    let state = remote.state();
    assert_eq!(state.cwd_calls.iter().filter(|p| p.as_str() == "/").count(), 2);
    assert_eq!(state.cwd_calls.last().map(String::as_str), Some("/"));
    assert!(state.cwd_calls.iter().any(|p| p == DAY2));
    assert_eq!(summary.failed_dates, vec![ymd(2019, 1, 1)]);
}
