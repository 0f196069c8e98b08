// ABOUTME: Server List Ping client used as the occupancy prober.
// ABOUTME: Speaks the game's unauthenticated status protocol over TCP.

pub mod codec;
mod prober;

pub use codec::{MAX_FRAME_SIZE, Players, StatusResponse};
pub use prober::StatusPinger;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("status exchange timed out")]
    Timeout,

    #[error("VarInt is longer than 5 bytes")]
    VarIntTooLong,

    #[error("negative length prefix: {0}")]
    NegativeLength(i32),

    #[error("frame of {0} bytes exceeds the {MAX_FRAME_SIZE} byte limit")]
    FrameTooLarge(usize),

    #[error("frame ended early")]
    Truncated,

    #[error("unexpected packet id {0:#04x}")]
    UnexpectedPacket(i32),

    #[error("status JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
