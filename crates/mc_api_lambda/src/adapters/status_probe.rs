use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde_json::Value;

use crate::runtime::ping::{
    handshake_packet, status_request_packet, status_response_json, ServerAddress, VarIntDecoder,
    MAX_FRAME_LEN,
};

/// Applied to connect, read, and write individually, so a probe against an
/// unreachable server fails within a Lambda invocation's patience.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Timeout,
    Failed(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => f.write_str("server did not answer within the probe timeout"),
            Self::Failed(reason) => f.write_str(reason),
        }
    }
}

impl std::error::Error for ProbeError {}

pub trait StatusProbe {
    fn query_status(&self, address: &ServerAddress) -> Result<Value, ProbeError>;
}

/// Speaks the Server List Ping status exchange over a plain TCP socket.
#[derive(Debug, Clone, Copy)]
pub struct TcpStatusProbe {
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TcpStatusProbe {
    pub fn new() -> Self {
        Self {
            connect_timeout: PROBE_TIMEOUT,
            io_timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeouts(connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            io_timeout,
        }
    }
}

impl Default for TcpStatusProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusProbe for TcpStatusProbe {
    fn query_status(&self, address: &ServerAddress) -> Result<Value, ProbeError> {
        let target = (address.host.as_str(), address.port)
            .to_socket_addrs()
            .map_err(probe_error)?
            .next()
            .ok_or_else(|| {
                ProbeError::Failed(format!("'{}' did not resolve to any address", address.host))
            })?;

        let mut stream =
            TcpStream::connect_timeout(&target, self.connect_timeout).map_err(probe_error)?;
        stream
            .set_read_timeout(Some(self.io_timeout))
            .map_err(probe_error)?;
        stream
            .set_write_timeout(Some(self.io_timeout))
            .map_err(probe_error)?;

        stream
            .write_all(&handshake_packet(&address.host, address.port))
            .map_err(probe_error)?;
        stream
            .write_all(&status_request_packet())
            .map_err(probe_error)?;

        let body = read_frame(&mut stream)?;
        let document = status_response_json(&body)
            .map_err(|error| ProbeError::Failed(error.message().to_string()))?;
        serde_json::from_str(document).map_err(|error| {
            ProbeError::Failed(format!("status response is not valid JSON: {error}"))
        })
    }
}

fn read_frame(stream: &mut TcpStream) -> Result<Vec<u8>, ProbeError> {
    let declared = read_varint(stream)?;
    let length = usize::try_from(declared)
        .map_err(|_| ProbeError::Failed(format!("frame declares a negative length {declared}")))?;
    if length > MAX_FRAME_LEN {
        return Err(ProbeError::Failed(format!(
            "frame length {length} exceeds the accepted maximum"
        )));
    }
    let mut body = vec![0u8; length];
    stream.read_exact(&mut body).map_err(probe_error)?;
    Ok(body)
}

fn read_varint(stream: &mut TcpStream) -> Result<i32, ProbeError> {
    let mut decoder = VarIntDecoder::new();
    loop {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte).map_err(probe_error)?;
        if let Some(value) = decoder
            .push(byte[0])
            .map_err(|error| ProbeError::Failed(error.message().to_string()))?
        {
            return Ok(value);
        }
    }
}

fn probe_error(error: io::Error) -> ProbeError {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeError::Timeout,
        _ => ProbeError::Failed(error.to_string()),
    }
}
