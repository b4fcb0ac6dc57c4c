use std::fmt;

use crate::error::FormatError;
use crate::format::WireFormat;
use crate::record::Record;

/// Размер сериализованной записи в одном wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSize {
    pub format: &'static str,
    pub bytes: usize,
}

impl fmt::Display for PayloadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Payload Size: {} bytes", self.format, self.bytes)
    }
}

/// Сериализовать одну запись каждым форматом и вернуть длины в байтах.
pub fn probe(record: &Record, formats: &[&dyn WireFormat]) -> Result<Vec<PayloadSize>, FormatError> {
    formats
        .iter()
        .map(|fmt| {
            let bytes = fmt.encode(record)?.len();
            Ok(PayloadSize { format: fmt.name(), bytes })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{JsonFormat, ProtobufFormat};

    fn sizes(record: &Record) -> (usize, usize) {
        let out = probe(record, &[&JsonFormat, &ProtobufFormat]).unwrap();
        assert_eq!(out[0].format, "JSON");
        assert_eq!(out[1].format, "Protobuf");
        (out[0].bytes, out[1].bytes)
    }

    #[test]
    fn sample_sizes() {
        assert_eq!(sizes(&Record::sample()), (37, 13));
    }

    #[test]
    fn protobuf_never_larger_than_json() {
        let records = [
            Record::sample(),
            Record::new("", "", 0),
            Record::new("", "", -1),
            Record::new("a-much-longer-identifier", "Some Name", i32::MIN),
            Record::new("\u{1F600}", "ü", i32::MAX),
        ];
        for record in &records {
            let (json, protobuf) = sizes(record);
            assert!(json > 0);
            assert!(protobuf <= json, "{record:?}: protobuf {protobuf} > json {json}");
        }
    }

    #[test]
    fn display_line() {
        let size = PayloadSize { format: "JSON", bytes: 37 };
        assert_eq!(size.to_string(), "JSON Payload Size: 37 bytes");
    }
}
