use std::io;

use thiserror::Error;

use crate::identity::{Address, PeerId};

#[derive(Debug, Error)]
pub enum BullyError {
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("Cannot encode or decode message: {0}")]
	Codec(#[from] bincode::Error),

	#[error("Frame of {size} bytes exceeds the limit of {limit} bytes")]
	FrameTooLarge { size: usize, limit: usize },

	#[error("No usable connection to peer {0}")]
	NotConnected(PeerId),

	#[error("Cannot resolve address {0}")]
	UnresolvedAddress(Address),

	#[error("Cannot bind a listening port on {host} after {attempts} attempts. Cause: {cause}")]
	Bind { host: String, attempts: u32, cause: io::Error },

	#[error("Cannot join the group via bootstrap service {address} after {attempts} attempts. Cause: {cause}")]
	Bootstrap { address: Address, attempts: u32, cause: Box<BullyError> },
}

pub type Result<T> = std::result::Result<T, BullyError>;
