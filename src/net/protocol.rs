//! Peer wire format: length-prefixed little-endian packets.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 9-character lowercase base-36 peer/room identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl PeerId {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let id = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        PeerId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        PeerId(s.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("packet too short: {0} bytes")]
    Truncated(usize),
    #[error("unknown packet id 0x{0:02X}")]
    UnknownPacketId(u8),
}

/// Packets exchanged over a peer channel. Fire-and-forget, no acks.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Position { position: Vec3 },
    Shoot { start: Vec3, end: Vec3 },
}

impl Packet {
    fn packet_id(&self) -> u8 {
        match self {
            Packet::Position { .. } => 0x10,
            Packet::Shoot { .. } => 0x20,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.packet_id());

        match self {
            Packet::Position { position } => {
                write_vec3(&mut buf, *position);
            }
            Packet::Shoot { start, end } => {
                write_vec3(&mut buf, *start);
                write_vec3(&mut buf, *end);
            }
        }

        let len = buf.len() as u16;
        let mut result = Vec::with_capacity(2 + buf.len());
        result.extend_from_slice(&len.to_le_bytes());
        result.extend(buf);
        result
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < 3 {
            return Err(ProtocolError::Truncated(data.len()));
        }

        let mut reader = Reader { data, offset: 0 };
        let _len = reader.read_u16()?;
        let id = reader.read_u8()?;

        match id {
            0x10 => {
                let position = reader.read_vec3()?;
                Ok(Packet::Position { position })
            }
            0x20 => {
                let start = reader.read_vec3()?;
                let end = reader.read_vec3()?;
                Ok(Packet::Shoot { start, end })
            }
            other => Err(ProtocolError::UnknownPacketId(other)),
        }
    }
}

fn write_vec3(buf: &mut Vec<u8>, v: Vec3) {
    buf.extend_from_slice(&v.x.to_le_bytes());
    buf.extend_from_slice(&v.y.to_le_bytes());
    buf.extend_from_slice(&v.z.to_le_bytes());
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize) -> Result<&[u8], ProtocolError> {
        if self.offset + n > self.data.len() {
            return Err(ProtocolError::Truncated(self.data.len()));
        }
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_f32(&mut self) -> Result<f32, ProtocolError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_vec3(&mut self) -> Result<Vec3, ProtocolError> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }
}
