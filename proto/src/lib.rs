//! Boundary messages between the simulation host and its front ends
//!
//! Uses postcard for efficient binary serialization

use postcard::{from_bytes, to_allocvec};

// ============================================================================
// Host to renderer
// ============================================================================

/// Snapshot of everything a renderer needs to draw one tick
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub epoch: u64, // Serves so far
    pub ball_x: f32,
    pub ball_y: f32,
    pub paddle_left_y: i32,
    pub paddle_right_y: i32,
    pub paddle_half_length: i32,
    pub score_left: u8,
    pub score_right: u8,
    pub corpus_len: u32,
}

// ============================================================================
// Input layer to host
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HostCommand {
    /// Pointer target for the trainer paddle while in pointer mode
    PointerMoved { y: i32 },

    TogglePause,

    /// Step to the next tick interval
    CycleSpeed,

    /// Switch the trainer paddle between automatic tracking and the pointer
    ToggleAutoMode,

    /// Fast-forward: run ticks back to back without publishing frames
    ToggleQuietMode,

    Stop,
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl Frame {
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

impl HostCommand {
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_serialization() {
        let frame = Frame {
            tick: 100,
            epoch: 3,
            ball_x: 412.5,
            ball_y: 120.25,
            paddle_left_y: 300,
            paddle_right_y: 128,
            paddle_half_length: 16,
            score_left: 5,
            score_right: 99,
            corpus_len: 731,
        };
        let bytes = frame.to_bytes().expect("Serialization should succeed");
        let decoded = Frame::from_bytes(&bytes).expect("Deserialization should succeed");
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_command_serialization() {
        let msg = HostCommand::PointerMoved { y: -12 };
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        match HostCommand::from_bytes(&bytes).expect("Deserialization should succeed") {
            HostCommand::PointerMoved { y } => assert_eq!(y, -12),
            other => panic!("Message type mismatch: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_bytes_are_rejected() {
        let bytes = HostCommand::PointerMoved { y: 4000 }.to_bytes().unwrap();
        assert!(HostCommand::from_bytes(&bytes[..1]).is_err());
        assert!(Frame::from_bytes(&[]).is_err());
    }
}
