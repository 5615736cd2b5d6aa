//! # Message Envelope Codec
//!
//! Application-level envelope carried inside an attestation payload.
//!
//! ```text
//! offset 0      : payload_id  (1 byte)  = 0x01
//! offset 1..2   : length L    (2 bytes, big-endian)
//! offset 3..3+L : payload     (L bytes)
//! total length  : 3 + L
//! ```

use super::errors::RelayError;
use super::invariants::invariant_payload_fits;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The only recognized envelope tag.
pub const PAYLOAD_ID_MESSAGE: u8 = 1;

/// Header size: tag byte plus 16-bit length.
pub const ENVELOPE_HEADER_LEN: usize = 3;

/// A decoded application message.
///
/// Construction goes through [`Message::new`] or [`Message::decode`], so the
/// payload always fits the length field and the tag is always recognized.
/// Deserialization applies the same checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageFields", into = "MessageFields")]
pub struct Message {
    payload_id: u8,
    payload: Vec<u8>,
}

/// Unchecked serde form of [`Message`].
#[derive(Serialize, Deserialize)]
struct MessageFields {
    payload_id: u8,
    payload: Vec<u8>,
}

impl TryFrom<MessageFields> for Message {
    type Error = RelayError;

    fn try_from(fields: MessageFields) -> Result<Self, Self::Error> {
        if fields.payload_id != PAYLOAD_ID_MESSAGE {
            return Err(RelayError::InvalidPayloadId(fields.payload_id));
        }
        Message::new(fields.payload)
    }
}

impl From<Message> for MessageFields {
    fn from(msg: Message) -> Self {
        Self {
            payload_id: msg.payload_id,
            payload: msg.payload,
        }
    }
}

impl Message {
    /// Wrap a payload, rejecting anything the length field cannot describe.
    pub fn new(payload: Vec<u8>) -> Result<Self, RelayError> {
        invariant_payload_fits(payload.len())?;
        Ok(Self {
            payload_id: PAYLOAD_ID_MESSAGE,
            payload,
        })
    }

    /// Envelope tag.
    pub fn payload_id(&self) -> u8 {
        self.payload_id
    }

    /// Application payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the message, returning its payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Encode to the wire envelope.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ENVELOPE_HEADER_LEN + self.payload.len());
        bytes.push(self.payload_id);
        // Length fits: enforced at construction
        bytes.extend_from_slice(&(self.payload.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Decode a wire envelope.
    ///
    /// The envelope must be exactly `3 + L` bytes; trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, RelayError> {
        let Some(&payload_id) = bytes.first() else {
            return Err(RelayError::InvalidLength {
                expected: ENVELOPE_HEADER_LEN,
                actual: 0,
            });
        };
        if payload_id != PAYLOAD_ID_MESSAGE {
            return Err(RelayError::InvalidPayloadId(payload_id));
        }

        if bytes.len() < ENVELOPE_HEADER_LEN {
            return Err(RelayError::InvalidLength {
                expected: ENVELOPE_HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let length = u16::from_be_bytes([bytes[1], bytes[2]]) as usize;
        let expected = ENVELOPE_HEADER_LEN + length;
        if bytes.len() != expected {
            debug!(
                "[qc-15] Envelope length mismatch: header says {}, have {}",
                expected,
                bytes.len()
            );
            return Err(RelayError::InvalidLength {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            payload_id,
            payload: bytes[ENVELOPE_HEADER_LEN..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_hello() {
        let msg = Message::new(b"hello".to_vec()).unwrap();
        assert_eq!(
            msg.encode(),
            vec![0x01, 0x00, 0x05, b'h', b'e', b'l', b'l', b'o']
        );
    }

    #[test]
    fn test_encode_empty_payload() {
        let msg = Message::new(Vec::new()).unwrap();
        assert_eq!(msg.encode(), vec![0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_new_rejects_oversized_payload() {
        let result = Message::new(vec![0u8; 65536]);
        assert!(matches!(result, Err(RelayError::MessageTooLarge { .. })));
    }

    #[test]
    fn test_max_payload_encodes_length_ffff() {
        let msg = Message::new(vec![7u8; 65535]).unwrap();
        let bytes = msg.encode();
        assert_eq!(&bytes[..3], &[0x01, 0xFF, 0xFF]);
        assert_eq!(bytes.len(), 3 + 65535);
    }

    #[test]
    fn test_max_payload_round_trips() {
        let msg = Message::new(vec![0xC3u8; 65535]).unwrap();
        let decoded = Message::decode(&msg.encode()).unwrap();
        assert_eq!(decoded.payload().len(), 65535);
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_deserialize_rejects_oversized_payload() {
        let json = format!(
            r#"{{"payload_id":1,"payload":{}}}"#,
            serde_json::to_string(&vec![0u8; 65536]).unwrap()
        );
        let err = serde_json::from_str::<Message>(&json).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_payload_id() {
        let result = serde_json::from_str::<Message>(r#"{"payload_id":9,"payload":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_round_trip_keeps_invariants() {
        let msg = Message::new(b"hello".to_vec()).unwrap();
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.encode(), msg.encode());
    }

    #[test]
    fn test_decode_rejects_unknown_payload_id() {
        assert_eq!(
            Message::decode(&[0x02, 0x00, 0x00]),
            Err(RelayError::InvalidPayloadId(2))
        );
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        // Claims 5 bytes, only 2 present
        let result = Message::decode(&[0x01, 0x00, 0x05, b'h', b'i']);
        assert_eq!(
            result,
            Err(RelayError::InvalidLength {
                expected: 8,
                actual: 5
            })
        );
    }

    #[test]
    fn test_decode_rejects_trailing_byte() {
        let mut bytes = Message::new(b"hello".to_vec()).unwrap().encode();
        bytes.push(0xFF);
        assert!(matches!(
            Message::decode(&bytes),
            Err(RelayError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        assert!(matches!(
            Message::decode(&[]),
            Err(RelayError::InvalidLength { actual: 0, .. })
        ));
        assert!(matches!(
            Message::decode(&[0x01, 0x00]),
            Err(RelayError::InvalidLength { actual: 2, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let msg = Message::new(payload).unwrap();
            let decoded = Message::decode(&msg.encode()).unwrap();
            prop_assert_eq!(decoded.payload_id(), PAYLOAD_ID_MESSAGE);
            prop_assert_eq!(decoded, msg);
        }
    }
}
