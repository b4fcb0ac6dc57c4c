use prost::Message;

use crate::error::FormatError;
use crate::proto;
use crate::record::Record;

/// Wire format — сериализация [`Record`] ↔ bytes.
///
/// Реализации: [`JsonFormat`] (текстовый протокол), [`ProtobufFormat`] (gRPC).
pub trait WireFormat: Send + Sync {
    /// Имя формата для отчётов ("JSON", "Protobuf").
    fn name(&self) -> &'static str;

    fn content_type(&self) -> &'static str;

    fn encode(&self, record: &Record) -> Result<Vec<u8>, FormatError>;

    fn decode(&self, data: &[u8]) -> Result<Record, FormatError>;
}

// ═══════════════════════════════════════════════════════════════
//  JSON
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl WireFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode(&self, record: &Record) -> Result<Vec<u8>, FormatError> {
        Ok(serde_json::to_vec(record)?)
    }

    fn decode(&self, data: &[u8]) -> Result<Record, FormatError> {
        Ok(serde_json::from_slice(data)?)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Protobuf
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufFormat;

impl WireFormat for ProtobufFormat {
    fn name(&self) -> &'static str {
        "Protobuf"
    }

    fn content_type(&self) -> &'static str {
        "application/x-protobuf"
    }

    fn encode(&self, record: &Record) -> Result<Vec<u8>, FormatError> {
        Ok(proto::Data::from(record.clone()).encode_to_vec())
    }

    fn decode(&self, data: &[u8]) -> Result<Record, FormatError> {
        let message = proto::Data::decode(data)?;
        Ok(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_field_names_match_wire_contract() {
        let bytes = JsonFormat.encode(&Record::sample()).unwrap();
        assert_eq!(bytes, br#"{"id":"123","name":"Test","value":42}"#);
    }

    #[test]
    fn json_decode_rejects_garbage() {
        assert!(matches!(JsonFormat.decode(b"{"), Err(FormatError::Json(_))));
        assert!(JsonFormat.decode(br#"{"id":"1"}"#).is_err());
    }

    #[test]
    fn protobuf_sample_layout() {
        let bytes = ProtobufFormat.encode(&Record::sample()).unwrap();
        let expected: &[u8] = &[
            0x0a, 3, b'1', b'2', b'3', //
            0x12, 4, b'T', b'e', b's', b't', //
            0x18, 42,
        ];
        assert_eq!(bytes, expected);
        assert_eq!(ProtobufFormat.decode(&bytes).unwrap(), Record::sample());
    }

    #[test]
    fn protobuf_decode_rejects_truncated_varint() {
        assert!(matches!(
            ProtobufFormat.decode(&[0x18, 0xff]),
            Err(FormatError::Protobuf(_))
        ));
    }
}
