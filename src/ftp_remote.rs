use std::{
    io::{self, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::{
    error::{is_transient_io, HimawariArchError},
    remote::{Credentials, RemoteArchive, RemoteSession},
};
use suppaftp::{types::FileType, FtpError, FtpStream};

pub const PTREE_HOST: &str = "ftp.ptree.jaxa.jp";
pub const FTP_PORT: u16 = 21;
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// The JAXA Himawari Monitor P-Tree FTP service.
#[derive(Debug, Clone)]
pub struct JaxaPTree {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Default for JaxaPTree {
    fn default() -> Self {
        JaxaPTree {
            host: PTREE_HOST.to_owned(),
            port: FTP_PORT,
            timeout: IDLE_TIMEOUT,
        }
    }
}

impl JaxaPTree {
    pub fn new<S: Into<String>>(host: S, port: u16, timeout: Duration) -> Self {
        JaxaPTree {
            host: host.into(),
            port,
            timeout,
        }
    }

    fn open_stream(&self) -> Result<FtpStream, HimawariArchError> {
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                HimawariArchError::Connection(format!("no address for {}", self.host))
            })?;

        let timeout = self.timeout;
        let stream = FtpStream::connect_timeout(addr, timeout)
            .map_err(|err| {
                HimawariArchError::Connection(format!("{}:{} : {}", self.host, self.port, err))
            })?
            .passive_stream_builder(move |data_addr| open_data_stream(data_addr, timeout));

        stream.get_ref().set_read_timeout(Some(timeout))?;
        stream.get_ref().set_write_timeout(Some(timeout))?;

        Ok(stream)
    }
}

/// PASV data connections get the same idle timeout as the control connection.
fn open_data_stream(addr: SocketAddr, timeout: Duration) -> Result<TcpStream, FtpError> {
    let stream = TcpStream::connect_timeout(&addr, timeout).map_err(FtpError::ConnectionError)?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(FtpError::ConnectionError)?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(FtpError::ConnectionError)?;

    Ok(stream)
}

impl RemoteArchive for JaxaPTree {
    type Session = PTreeSession;

    fn connect(&self, credentials: &Credentials) -> Result<PTreeSession, HimawariArchError> {
        let mut stream = self.open_stream()?;

        stream
            .login(credentials.user.as_str(), credentials.passwd.as_str())
            .map_err(|err| match err {
                FtpError::UnexpectedResponse(_) => HimawariArchError::Authentication(format!(
                    "{} as {} : {}",
                    self.host, credentials.user, err
                )),
                other => HimawariArchError::Connection(other.to_string()),
            })?;

        stream.transfer_type(FileType::Binary)?;

        log::info!("Logged in to {}:{} as {}", self.host, self.port, credentials.user);

        Ok(PTreeSession { stream })
    }
}

pub struct PTreeSession {
    stream: FtpStream,
}

impl RemoteSession for PTreeSession {
    fn change_directory(&mut self, path: &str) -> Result<(), HimawariArchError> {
        self.stream.cwd(path)?;
        Ok(())
    }

    fn list_files(&mut self) -> Result<Vec<String>, HimawariArchError> {
        Ok(self.stream.nlst(None)?)
    }

    fn retrieve_file(
        &mut self,
        file_name: &str,
        dest: &mut dyn Write,
    ) -> Result<u64, HimawariArchError> {
        let copied = self.stream.retr(file_name, |reader| {
            io::copy(reader, &mut *dest).map_err(FtpError::ConnectionError)
        })?;

        Ok(copied)
    }

    fn quit(&mut self) -> Result<(), HimawariArchError> {
        self.stream.quit()?;
        Ok(())
    }
}

/// 421, service not available, closing control connection.
const SERVICE_CLOSING: u32 = 421;

impl From<FtpError> for HimawariArchError {
    fn from(err: FtpError) -> Self {
        match err {
            FtpError::ConnectionError(io_err) if is_transient_io(&io_err) => {
                HimawariArchError::Transient(io_err.to_string())
            }
            FtpError::ConnectionError(io_err) => HimawariArchError::Io(io_err),
            // An empty read on the control connection: the server hung up.
            FtpError::BadResponse => {
                HimawariArchError::Transient("connection closed by server".into())
            }
            FtpError::UnexpectedResponse(resp) if resp.status.code() == SERVICE_CLOSING => {
                HimawariArchError::Transient(format!(
                    "{} {}",
                    SERVICE_CLOSING,
                    String::from_utf8_lossy(&resp.body).trim()
                ))
            }
            other => HimawariArchError::Operation(other.to_string()),
        }
    }
}
