use std::io::Write;

use crate::{
    error::HimawariArchError,
    remote::{Credentials, RemoteArchive, RemoteSession},
};

/// Total tries for a single remote call before giving up on it.
pub const CALL_ATTEMPTS: usize = 3;

/// The single session to the remote archive, torn down and rebuilt as needed.
pub struct Connection<RA: RemoteArchive> {
    remote: RA,
    credentials: Credentials,
    session: Option<RA::Session>,
}

impl<RA: RemoteArchive> Connection<RA> {
    /// Log in right away. Failure here is not retried.
    pub fn open(remote: RA, credentials: Credentials) -> Result<Self, HimawariArchError> {
        let mut conn = Connection {
            remote,
            credentials,
            session: None,
        };
        conn.connect()?;

        Ok(conn)
    }

    pub fn connect(&mut self) -> Result<(), HimawariArchError> {
        let session = self.remote.connect(&self.credentials)?;
        self.session = Some(session);
        Ok(())
    }

    pub fn reconnect(&mut self) -> Result<(), HimawariArchError> {
        self.disconnect();
        self.connect()
    }

    /// Drop the session. Calling this while already disconnected does nothing.
    pub fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(err) = session.quit() {
                log::debug!("Ignoring error while closing session: {}", err);
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn change_directory(&mut self, path: &str) -> Result<(), HimawariArchError> {
        self.resilient("change directory", |session| session.change_directory(path))
    }

    pub fn list_files(&mut self) -> Result<Vec<String>, HimawariArchError> {
        self.resilient("list files", |session| session.list_files())
    }

    /// `open_dest` is called once per attempt so a retry never appends to a half written sink.
    pub fn retrieve_file<W, F>(
        &mut self,
        file_name: &str,
        mut open_dest: F,
    ) -> Result<u64, HimawariArchError>
    where
        W: Write,
        F: FnMut() -> Result<W, HimawariArchError>,
    {
        self.resilient("retrieve file", |session| {
            let mut dest = open_dest()?;
            let copied = session.retrieve_file(file_name, &mut dest)?;
            dest.flush()?;
            Ok(copied)
        })
    }

    /// Run `op` against the live session. Transient failures trigger a reconnect and another
    /// try, up to `CALL_ATTEMPTS` in total. Anything else is handed straight back.
    pub fn resilient<T, F>(&mut self, op_name: &str, mut op: F) -> Result<T, HimawariArchError>
    where
        F: FnMut(&mut RA::Session) -> Result<T, HimawariArchError>,
    {
        for attempt in 1..=CALL_ATTEMPTS {
            let res = match self.session.as_mut() {
                Some(session) => op(session),
                None => Err(HimawariArchError::Transient("not connected".into())),
            };

            match res {
                Ok(val) => return Ok(val),
                Err(err) if err.is_transient() => {
                    log::warn!(
                        "FTP connection lost during {} ({}/{}): {}. Reconnecting...",
                        op_name,
                        attempt,
                        CALL_ATTEMPTS,
                        err
                    );
                    self.reconnect()?;
                }
                Err(err) => return Err(err),
            }
        }

        Err(HimawariArchError::Connection(format!(
            "failed to {} after {} attempts",
            op_name, CALL_ATTEMPTS
        )))
    }
}

impl<RA: RemoteArchive> Drop for Connection<RA> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
