use std::convert::TryFrom;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::communication::connection_cache::PeerConnection;
use crate::communication::messages::Envelope;
use crate::communication::PeerReply;
use crate::errors::{BullyError, Result};

const FRAME_HEADER_SIZE: usize = 4;

/// Writes `value` as one frame: a big-endian `u32` length followed by the bincode bytes.
pub fn send_frame<T: Serialize, W: Write>(writer: &mut W, value: &T, max_frame_size: usize) -> Result<()> {
	let body = bincode::serialize(value)?;
	if body.len() > max_frame_size {
		return Err(BullyError::FrameTooLarge { size: body.len(), limit: max_frame_size });
	}

	let header = frame_header(body.len())?;
	let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + body.len());
	frame.extend_from_slice(&header);
	frame.extend_from_slice(&body);

	writer.write_all(&frame)?;
	writer.flush()?;

	Ok(())
}

fn frame_header(size: usize) -> Result<[u8; FRAME_HEADER_SIZE]> {
	match u32::try_from(size) {
		Ok(size) => Ok(size.to_be_bytes()),
		Err(_) => Err(BullyError::FrameTooLarge { size, limit: u32::MAX as usize }),
	}
}

pub fn receive_frame<T: DeserializeOwned, R: Read>(reader: &mut R, max_frame_size: usize) -> Result<T> {
	let mut header = [0u8; FRAME_HEADER_SIZE];
	reader.read_exact(&mut header)?;

	let size = u32::from_be_bytes(header) as usize;
	if size > max_frame_size {
		return Err(BullyError::FrameTooLarge { size, limit: max_frame_size });
	}

	let mut body = vec![0u8; size];
	reader.read_exact(&mut body)?;

	Ok(bincode::deserialize(&body)?)
}

pub fn receive_envelope<R: Read>(reader: &mut R, max_frame_size: usize) -> Result<Envelope> {
	receive_frame(reader, max_frame_size)
}

/// Fire-and-forget send.
pub fn notify(connection: &PeerConnection, envelope: &Envelope, max_frame_size: usize) -> Result<()> {
	connection.with_stream(|stream| send_frame(stream, envelope, max_frame_size))
}

/// Sends `envelope` and waits up to `receive_timeout` for exactly one reply. Any
/// failure on the way is reported as [`PeerReply::Unreachable`].
pub fn request(connection: &PeerConnection, envelope: &Envelope, receive_timeout: Duration, max_frame_size: usize) -> PeerReply {
	let exchange_result = connection.with_stream(|stream| exchange(stream, envelope, receive_timeout, max_frame_size));

	match exchange_result {
		Ok(reply) => PeerReply::Answered(reply),
		Err(err) => {
			info!("Peer {} did not answer {}: {}", connection.peer_id(), envelope.message.name(), err);
			PeerReply::Unreachable
		}
	}
}

fn exchange(stream: &mut TcpStream, envelope: &Envelope, receive_timeout: Duration, max_frame_size: usize) -> Result<Envelope> {
	stream.set_read_timeout(Some(receive_timeout))?;
	stream.set_write_timeout(Some(receive_timeout))?;

	send_frame(stream, envelope, max_frame_size)?;
	receive_envelope(stream, max_frame_size)
}
