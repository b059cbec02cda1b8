use std::io::Write;

use crate::error::HimawariArchError;

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub passwd: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("passwd", &"***")
            .finish()
    }
}

/// Something we can open an authenticated session against.
pub trait RemoteArchive {
    type Session: RemoteSession;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Session, HimawariArchError>;
}

/// One live, stateful session with a working directory.
pub trait RemoteSession {
    fn change_directory(&mut self, path: &str) -> Result<(), HimawariArchError>;

    fn list_files(&mut self) -> Result<Vec<String>, HimawariArchError>;

    /// Stream `file_name` from the working directory into `dest`, returning the bytes copied.
    fn retrieve_file(
        &mut self,
        file_name: &str,
        dest: &mut dyn Write,
    ) -> Result<u64, HimawariArchError>;

    fn quit(&mut self) -> Result<(), HimawariArchError>;
}
