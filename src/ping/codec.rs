// ABOUTME: Wire encoding for the Server List Ping status exchange.
// ABOUTME: VarInt length-prefixed frames built with `bytes`, read with a size cap.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::PingError;

/// Largest status frame we are willing to buffer.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Protocol version sent in the handshake; -1 asks for any version's status.
const PROTOCOL_VERSION: i32 = -1;
const HANDSHAKE_PACKET: i32 = 0x00;
const STATUS_REQUEST_PACKET: i32 = 0x00;
const STATUS_RESPONSE_PACKET: i32 = 0x00;
const NEXT_STATE_STATUS: i32 = 1;

const VARINT_MAX_BYTES: usize = 5;

pub fn put_varint(buf: &mut BytesMut, value: i32) {
    // Negative values are encoded as their two's complement bit pattern.
    let mut value = value as u32;
    loop {
        if value & !0x7f == 0 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
}

pub fn get_varint(buf: &mut impl Buf) -> Result<i32, PingError> {
    let mut result: u32 = 0;
    for i in 0..VARINT_MAX_BYTES {
        if !buf.has_remaining() {
            return Err(PingError::Truncated);
        }
        let byte = buf.get_u8();
        result |= u32::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(PingError::VarIntTooLong)
}

pub fn put_string(buf: &mut BytesMut, value: &str) {
    put_varint(buf, value.len() as i32);
    buf.put_slice(value.as_bytes());
}

fn frame(packet_id: i32, body: &[u8]) -> Bytes {
    let mut packet = BytesMut::with_capacity(body.len() + VARINT_MAX_BYTES);
    put_varint(&mut packet, packet_id);
    packet.put_slice(body);

    let mut out = BytesMut::with_capacity(packet.len() + VARINT_MAX_BYTES);
    put_varint(&mut out, packet.len() as i32);
    out.put_slice(&packet);
    out.freeze()
}

/// Handshake announcing a status query for `host:port`.
pub fn handshake(host: &str, port: u16) -> Bytes {
    let mut body = BytesMut::new();
    put_varint(&mut body, PROTOCOL_VERSION);
    put_string(&mut body, host);
    body.put_u16(port);
    put_varint(&mut body, NEXT_STATE_STATUS);
    frame(HANDSHAKE_PACKET, &body)
}

pub fn status_request() -> Bytes {
    frame(STATUS_REQUEST_PACKET, &[])
}

async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, PingError> {
    let mut result: u32 = 0;
    for i in 0..VARINT_MAX_BYTES {
        let byte = reader.read_u8().await?;
        result |= u32::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(PingError::VarIntTooLong)
}

/// Read one length-prefixed frame, rejecting anything over [`MAX_FRAME_SIZE`].
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Bytes, PingError> {
    let len = read_varint(reader).await?;
    let len = usize::try_from(len).map_err(|_| PingError::NegativeLength(len))?;
    if len > MAX_FRAME_SIZE {
        return Err(PingError::FrameTooLarge(len));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(Bytes::from(buf))
}

/// The parts of the status JSON we use.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub players: Players,
    #[serde(default)]
    pub version: Option<Version>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Players {
    pub online: u32,
    #[serde(default)]
    pub max: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    pub name: String,
    #[serde(default)]
    pub protocol: i32,
}

/// Decode a status response frame body.
pub fn parse_status(mut frame: Bytes) -> Result<StatusResponse, PingError> {
    let packet_id = get_varint(&mut frame)?;
    if packet_id != STATUS_RESPONSE_PACKET {
        return Err(PingError::UnexpectedPacket(packet_id));
    }

    let len = get_varint(&mut frame)?;
    let len = usize::try_from(len).map_err(|_| PingError::NegativeLength(len))?;
    if frame.remaining() < len {
        return Err(PingError::Truncated);
    }

    let json = frame.split_to(len);
    Ok(serde_json::from_slice(&json)?)
}
