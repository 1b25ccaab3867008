//! Interpretation of acknowledgements on the origin chain.

use crate::codec::{Acknowledgement, PacketCodec};
use crate::domain::{advance_packet_state, LinksError, PacketState};
use crate::ports::AckOutcome;

/// Decode the outcome carried by `ack` and the origin state it leads to.
///
/// A result that does not carry a `PacketAck` is a protocol violation and
/// is returned as an error.
pub fn interpret_acknowledgement(
    codec: &PacketCodec,
    ack: &Acknowledgement,
) -> Result<(AckOutcome, PacketState), LinksError> {
    match ack {
        Acknowledgement::Result(bytes) => {
            let packet_ack = codec.decode_packet_ack(bytes)?;
            let state = advance_packet_state(PacketState::Committed, PacketState::Acknowledged)?;
            Ok((AckOutcome::Success(packet_ack), state))
        }
        Acknowledgement::Error(reason) => {
            let state = advance_packet_state(PacketState::Rejected, PacketState::Failed)?;
            Ok((AckOutcome::Error(reason.clone()), state))
        }
    }
}
