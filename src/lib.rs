/**************************************************************************************************
 *                                           Public API
 *************************************************************************************************/
pub use crate::{
    archive::{ArchiveFetcher, RunSummary, DATE_ATTEMPTS, RETRY_PAUSE},
    config::Config,
    connection::{Connection, CALL_ATTEMPTS},
    error::HimawariArchError,
    ftp_remote::{JaxaPTree, PTreeSession},
    product::{remote_directory, RemoteFile},
    remote::{Credentials, RemoteArchive, RemoteSession},
    satellite::Satellite,
    selection::{DateRange, HourFilter},
};
/**************************************************************************************************
 *                                      Private Implementation
 *************************************************************************************************/
mod archive;
mod config;
mod connection;
mod error;
mod ftp_remote;
mod product;
mod remote;
mod satellite;
mod selection;
