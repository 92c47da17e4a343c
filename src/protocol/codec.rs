//! Byte-level framing of [`Message`]s.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::game::HAND_SIZE;
use crate::game::{Card, Outcome};
use crate::protocol::error::CodecError;
use crate::protocol::messages::{Message, Opcode};

/// Fixed-length framing for war messages.
///
/// `decode` returns `Ok(None)` until the whole message announced by the
/// opcode byte has arrived. The codec understands all four opcodes; deciding
/// whether a message is legal for the sender is up to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct WarCodec;

fn card(byte: u8) -> Result<Card, CodecError> {
    Card::new(byte).ok_or(CodecError::InvalidCard(byte))
}

impl Decoder for WarCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, CodecError> {
        let Some(&first) = src.first() else {
            return Ok(None);
        };
        let opcode = Opcode::try_from(first)?;
        let len = opcode.message_len();
        if src.len() < len {
            src.reserve(len - src.len());
            return Ok(None);
        }

        src.advance(1);
        let payload = src.split_to(len - 1);
        let message = match opcode {
            // The WANTGAME byte carries nothing the server uses.
            Opcode::WantGame => Message::WantGame,
            Opcode::GameStart => Message::GameStart(
                payload
                    .iter()
                    .map(|&b| card(b))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Opcode::PlayCard => Message::PlayCard(card(payload[0])?),
            Opcode::PlayResult => Message::PlayResult(Outcome::try_from(payload[0])?),
        };
        Ok(Some(message))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Message>, CodecError> {
        match self.decode(buf)? {
            Some(message) => Ok(Some(message)),
            None if buf.is_empty() => Ok(None),
            None => Err(CodecError::Truncated {
                opcode: buf[0],
                expected: Opcode::try_from(buf[0])?.message_len(),
                received: buf.len(),
            }),
        }
    }
}

impl Encoder<Message> for WarCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), CodecError> {
        let opcode = item.opcode();
        if let Message::GameStart(hand) = &item {
            if hand.len() != HAND_SIZE {
                return Err(CodecError::InvalidHand {
                    expected: HAND_SIZE,
                    actual: hand.len(),
                });
            }
        }

        dst.reserve(opcode.message_len());
        dst.put_u8(opcode as u8);
        match item {
            Message::WantGame => dst.put_u8(0),
            Message::GameStart(hand) => dst.extend(hand.into_iter().map(u8::from)),
            Message::PlayCard(card) => dst.put_u8(card.into()),
            Message::PlayResult(outcome) => dst.put_u8(outcome.into()),
        }
        Ok(())
    }
}
