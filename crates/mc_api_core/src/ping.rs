//! Server List Ping framing.
//!
//! The status exchange is two client packets (handshake, status request)
//! followed by one server packet carrying a JSON document. Every packet is
//! framed as a VarInt length followed by the packet body, and the body
//! starts with a VarInt packet id. VarInts are 7-bit little-endian groups
//! with a continuation bit, at most five bytes, interpreted as an i32.

pub const DEFAULT_PORT: u16 = 25565;

/// Protocol version sent during a status handshake. Servers accept any
/// value here for status queries; -1 is the conventional "don't care".
pub const STATUS_PROTOCOL_VERSION: i32 = -1;

pub const HANDSHAKE_PACKET_ID: i32 = 0x00;
pub const STATUS_REQUEST_PACKET_ID: i32 = 0x00;
pub const STATUS_RESPONSE_PACKET_ID: i32 = 0x00;
pub const HANDSHAKE_NEXT_STATE_STATUS: i32 = 1;

/// Upper bound accepted for a single frame. Status documents are a few KiB,
/// so anything larger indicates a corrupt stream or a non-Minecraft peer.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

pub const VARINT_MAX_BYTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    message: String,
}

impl ProtocolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProtocolError {}

pub fn write_varint(buffer: &mut Vec<u8>, value: i32) {
    let mut remaining = value as u32;
    loop {
        let group = (remaining & 0x7F) as u8;
        remaining >>= 7;
        if remaining == 0 {
            buffer.push(group);
            return;
        }
        buffer.push(group | 0x80);
    }
}

/// Incremental VarInt decoder for byte-at-a-time reads from a socket.
#[derive(Debug, Default)]
pub struct VarIntDecoder {
    value: u32,
    bytes_seen: u32,
}

impl VarIntDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte. Returns the decoded value once the final byte (the
    /// one without a continuation bit) has been seen.
    pub fn push(&mut self, byte: u8) -> Result<Option<i32>, ProtocolError> {
        if self.bytes_seen == VARINT_MAX_BYTES {
            return Err(ProtocolError::new("varint runs past its five-byte maximum"));
        }
        self.value |= u32::from(byte & 0x7F) << (7 * self.bytes_seen);
        self.bytes_seen += 1;
        if byte & 0x80 == 0 {
            Ok(Some(self.value as i32))
        } else {
            Ok(None)
        }
    }
}

/// Decodes one VarInt from the front of `bytes`, returning the value and
/// how many bytes it occupied.
pub fn decode_varint(bytes: &[u8]) -> Result<(i32, usize), ProtocolError> {
    let mut decoder = VarIntDecoder::new();
    for (index, byte) in bytes.iter().enumerate() {
        if let Some(value) = decoder.push(*byte)? {
            return Ok((value, index + 1));
        }
    }
    Err(ProtocolError::new("varint ends before its final byte"))
}

pub fn write_string(buffer: &mut Vec<u8>, value: &str) {
    write_varint(buffer, value.len() as i32);
    buffer.extend_from_slice(value.as_bytes());
}

fn frame(body: Vec<u8>) -> Vec<u8> {
    let mut framed = Vec::with_capacity(body.len() + VARINT_MAX_BYTES as usize);
    write_varint(&mut framed, body.len() as i32);
    framed.extend_from_slice(&body);
    framed
}

/// Handshake packet announcing the status intention for `host:port`.
pub fn handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut body = Vec::new();
    write_varint(&mut body, HANDSHAKE_PACKET_ID);
    write_varint(&mut body, STATUS_PROTOCOL_VERSION);
    write_string(&mut body, host);
    body.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut body, HANDSHAKE_NEXT_STATE_STATUS);
    frame(body)
}

pub fn status_request_packet() -> Vec<u8> {
    let mut body = Vec::new();
    write_varint(&mut body, STATUS_REQUEST_PACKET_ID);
    frame(body)
}

/// Extracts the JSON document from a status response packet body (the frame
/// length VarInt must already be stripped).
pub fn status_response_json(body: &[u8]) -> Result<&str, ProtocolError> {
    let (packet_id, id_len) = decode_varint(body)?;
    if packet_id != STATUS_RESPONSE_PACKET_ID {
        return Err(ProtocolError::new(format!(
            "unexpected packet id {packet_id} in status response"
        )));
    }
    let rest = &body[id_len..];
    let (declared_len, len_len) = decode_varint(rest)?;
    let declared_len = usize::try_from(declared_len)
        .map_err(|_| ProtocolError::new("status response declares a negative length"))?;
    let payload = rest.get(len_len..len_len + declared_len).ok_or_else(|| {
        ProtocolError::new("status response is shorter than its declared length")
    })?;
    std::str::from_utf8(payload)
        .map_err(|_| ProtocolError::new("status response is not valid UTF-8"))
}

/// A `host` or `host:port` target. Bare IPv6 addresses are taken whole;
/// the port suffix form only applies when the head contains no further
/// colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let (host, port) = match input.rsplit_once(':') {
            Some((head, tail)) if !head.contains(':') => {
                let port = tail
                    .parse::<u16>()
                    .map_err(|_| ProtocolError::new(format!("invalid port '{tail}'")))?;
                (head, port)
            }
            _ => (input, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(ProtocolError::new("hostname cannot be empty"));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
