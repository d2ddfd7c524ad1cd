//! The one generic routine that turns a layout plus values into bytes and
//! back.

use bytes::{Buf, BufMut, BytesMut};

use crate::catalog::{layout_for, layout_for_code, Field, FieldType};
use crate::decoder::DecodedEvent;
use crate::error::{DecodeError, EncodeError};
use crate::kind::EventKind;
use crate::value::Value;

/// `u32 kind` + `u64 timestamp`.
pub const EVENT_HEADER_SIZE: usize = 12;

/// Append one encoded event (header and payload) to `dst`.
///
/// On error `dst` may hold a partial event; callers encode into scratch
/// space and discard it.
pub(crate) fn encode_event(
    kind: EventKind,
    args: &[Value],
    dst: &mut BytesMut,
) -> Result<(), EncodeError> {
    let layout = layout_for(kind);
    let expected = layout.arg_count();
    if args.len() != expected {
        return Err(EncodeError::Arity {
            kind,
            expected,
            got: args.len(),
        });
    }

    dst.reserve(EVENT_HEADER_SIZE + layout.size());
    dst.put_u32_le(kind.code());
    // Reserved timestamp, always zero.
    dst.put_u64_le(0);

    let mut args = args.iter();
    let mut lengths: Vec<(&'static str, u64)> = Vec::new();
    for field in layout.fields() {
        if let FieldType::Pad(n) = field.ty {
            dst.put_bytes(0, n);
            continue;
        }
        let Some(value) = args.next() else {
            return Err(EncodeError::Arity {
                kind,
                expected,
                got: 0,
            });
        };
        if let Some(n) = put_field(kind, field, value, dst)? {
            lengths.push((field.name, n));
        }
    }

    for segment in layout.segments() {
        let Some(value) = args.next() else {
            return Err(EncodeError::Arity {
                kind,
                expected,
                got: 0,
            });
        };
        let bytes = value.as_bytes().ok_or_else(|| EncodeError::Type {
            kind,
            field: segment.name,
            expected: "bytes or text".into(),
            got: value.type_name(),
        })?;
        let declared = lengths
            .iter()
            .find(|(name, _)| *name == segment.length_field)
            .map_or(0, |(_, n)| *n);
        if declared != bytes.len() as u64 {
            return Err(EncodeError::LengthMismatch {
                kind,
                field: segment.length_field,
                declared,
                actual: bytes.len(),
            });
        }
        dst.put_slice(bytes);
    }
    Ok(())
}

/// Write one non-padding field. Returns the value of unsigned 32-bit fields
/// so segment lengths can be checked.
fn put_field(
    kind: EventKind,
    field: &Field,
    value: &Value,
    dst: &mut BytesMut,
) -> Result<Option<u64>, EncodeError> {
    match field.ty {
        FieldType::I32 => dst.put_i32_le(int_arg(kind, field, value)?),
        FieldType::I64 => dst.put_i64_le(int_arg(kind, field, value)?),
        FieldType::U8 => dst.put_u8(int_arg(kind, field, value)?),
        FieldType::U16 => dst.put_u16_le(int_arg(kind, field, value)?),
        FieldType::U32 => {
            let n: u32 = int_arg(kind, field, value)?;
            dst.put_u32_le(n);
            return Ok(Some(u64::from(n)));
        }
        FieldType::U64 => dst.put_u64_le(int_arg(kind, field, value)?),
        FieldType::F32 => dst.put_f32_le(float_arg(kind, field, value)? as f32),
        FieldType::F64 => dst.put_f64_le(float_arg(kind, field, value)?),
        FieldType::Chars(max) => {
            let bytes = value.as_bytes().ok_or_else(|| type_error(kind, field, value))?;
            if bytes.len() > max {
                return Err(EncodeError::TooLong {
                    kind,
                    field: field.name,
                    len: bytes.len(),
                    max,
                });
            }
            dst.put_slice(bytes);
            dst.put_bytes(0, max - bytes.len());
        }
        FieldType::Pad(n) => dst.put_bytes(0, n),
    }
    Ok(None)
}

fn int_arg<T: TryFrom<i128>>(
    kind: EventKind,
    field: &Field,
    value: &Value,
) -> Result<T, EncodeError> {
    let wide = match *value {
        Value::Int(v) => i128::from(v),
        Value::UInt(v) => i128::from(v),
        _ => return Err(type_error(kind, field, value)),
    };
    T::try_from(wide).map_err(|_| EncodeError::OutOfRange {
        kind,
        field: field.name,
        value: wide.to_string(),
        ty: field.ty.label(),
    })
}

fn float_arg(kind: EventKind, field: &Field, value: &Value) -> Result<f64, EncodeError> {
    match value {
        Value::Float(_) | Value::Int(_) | Value::UInt(_) => {
            value.as_f64().ok_or_else(|| type_error(kind, field, value))
        }
        _ => Err(type_error(kind, field, value)),
    }
}

fn type_error(kind: EventKind, field: &Field, value: &Value) -> EncodeError {
    EncodeError::Type {
        kind,
        field: field.name,
        expected: field.ty.label(),
        got: value.type_name(),
    }
}

/// Read position over a blob, tracking the absolute offset for diagnostics.
pub(crate) struct Reader<'a> {
    blob: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(blob: &'a [u8]) -> Self {
        Self { blob, pos: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.blob.len() - self.pos
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::truncated(self.pos, n, self.remaining()));
        }
        let slice = &self.blob[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        self.take(4).map(|mut b| b.get_u32_le())
    }

    pub(crate) fn u64(&mut self) -> Result<u64, DecodeError> {
        self.take(8).map(|mut b| b.get_u64_le())
    }
}

/// Decode the event starting at the reader's position.
pub(crate) fn decode_event(reader: &mut Reader<'_>) -> Result<DecodedEvent, DecodeError> {
    let start = reader.offset();
    let code = reader.u32()?;
    let timestamp = reader.u64()?;
    let (kind, layout) = layout_for_code(code).ok_or(DecodeError::UnknownKind {
        code,
        offset: start,
    })?;

    let mut payload = reader.take(layout.size())?;
    let mut fields = Vec::with_capacity(layout.arg_count());
    for field in layout.fields() {
        let at = reader.offset() - payload.remaining();
        let value = match field.ty {
            FieldType::Pad(n) => {
                payload.advance(n);
                continue;
            }
            FieldType::I32 => Value::Int(payload.get_i32_le().into()),
            FieldType::I64 => Value::Int(payload.get_i64_le()),
            FieldType::U8 => Value::UInt(payload.get_u8().into()),
            FieldType::U16 => Value::UInt(payload.get_u16_le().into()),
            FieldType::U32 => Value::UInt(payload.get_u32_le().into()),
            FieldType::U64 => Value::UInt(payload.get_u64_le()),
            FieldType::F32 => Value::Float(payload.get_f32_le().into()),
            FieldType::F64 => Value::Float(payload.get_f64_le()),
            FieldType::Chars(n) => {
                let (raw, rest) = payload.split_at(n);
                payload = rest;
                let end = raw.iter().position(|&b| b == 0).unwrap_or(n);
                Value::Text(utf8(kind, field.name, &raw[..end], at)?)
            }
        };
        fields.push((field.name, value));
    }

    for segment in layout.segments() {
        let len = fields
            .iter()
            .find(|(name, _)| *name == segment.length_field)
            .and_then(|(_, v)| v.as_u64())
            .unwrap_or(0);
        let at = reader.offset();
        let len = usize::try_from(len).map_err(|_| {
            DecodeError::truncated(at, usize::MAX, reader.remaining())
        })?;
        let raw = reader.take(len)?;
        fields.push((segment.name, Value::Text(utf8(kind, segment.name, raw, at)?)));
    }

    Ok(DecodedEvent {
        kind,
        timestamp,
        fields,
    })
}

fn utf8(
    kind: EventKind,
    field: &'static str,
    raw: &[u8],
    offset: usize,
) -> Result<String, DecodeError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| DecodeError::TextDecode {
            kind,
            field,
            offset,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn encode(kind: EventKind, args: Vec<Value>) -> Result<Vec<u8>, EncodeError> {
        let mut buf = BytesMut::new();
        encode_event(kind, &args, &mut buf).map(|()| buf.to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<DecodedEvent, DecodeError> {
        decode_event(&mut Reader::new(bytes))
    }

    #[test]
    fn sprite_remove_bytes() {
        let bytes = encode(EventKind::SpriteRemove, args![42i64, 7i64]).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&0u64.to_le_bytes());
        expected.extend_from_slice(&42i64.to_le_bytes());
        expected.extend_from_slice(&7i64.to_le_bytes());
        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), 28);
    }

    #[test]
    fn padding_is_zeroed() {
        let bytes = encode(EventKind::SpriteColor, args![1i64, 2i64, 10u8, 20u8, 30u8, 40u8]).unwrap();
        assert_eq!(bytes.len(), EVENT_HEADER_SIZE + 24);
        assert_eq!(&bytes[28..32], &[10, 20, 30, 40]);
        assert_eq!(&bytes[32..36], &[0, 0, 0, 0]);
    }

    /// Encode and decode every fixed layout with arguments chosen per field
    /// type by `pick`.
    fn round_trip_fixed_layouts(pick: impl Fn(FieldType) -> Value) {
        for (kind, layout) in crate::catalog::entries() {
            if layout.is_variable() {
                continue;
            }
            let args: Vec<Value> = layout
                .fields()
                .iter()
                .filter(|f| !f.ty.is_pad())
                .map(|f| pick(f.ty))
                .collect();

            let bytes = encode(kind, args.clone()).unwrap();
            assert_eq!(bytes.len(), EVENT_HEADER_SIZE + layout.size(), "{kind}");

            let event = decode(&bytes).unwrap();
            assert_eq!(event.kind, kind);
            assert_eq!(event.timestamp, 0);
            let decoded: Vec<Value> = event.fields.into_iter().map(|(_, v)| v).collect();
            assert_eq!(decoded, args, "{kind}");
        }
    }

    #[test]
    fn every_fixed_layout_round_trips_boundary_values() {
        round_trip_fixed_layouts(|ty| match ty {
            FieldType::I32 | FieldType::I64 => Value::Int(-1),
            FieldType::U8 => Value::UInt(255),
            FieldType::U16 => Value::UInt(u16::MAX.into()),
            FieldType::U32 => Value::UInt(0),
            FieldType::U64 => Value::UInt(u64::MAX),
            FieldType::F32 => Value::Float(-0.5),
            FieldType::F64 => Value::Float(1e300),
            FieldType::Chars(_) => Value::Text("Phrost".into()),
            FieldType::Pad(_) => unreachable!(),
        });
    }

    #[test]
    fn every_fixed_layout_round_trips_zero() {
        round_trip_fixed_layouts(|ty| match ty {
            FieldType::I32 | FieldType::I64 => Value::Int(0),
            FieldType::U8 | FieldType::U16 | FieldType::U32 | FieldType::U64 => Value::UInt(0),
            FieldType::F32 | FieldType::F64 => Value::Float(0.0),
            FieldType::Chars(_) => Value::Text(String::new()),
            FieldType::Pad(_) => unreachable!(),
        });
    }

    #[test]
    fn every_fixed_layout_round_trips_minimums() {
        round_trip_fixed_layouts(|ty| match ty {
            FieldType::I32 => Value::Int(i32::MIN.into()),
            FieldType::I64 => Value::Int(i64::MIN),
            FieldType::U8 | FieldType::U16 | FieldType::U32 | FieldType::U64 => Value::UInt(0),
            FieldType::F32 => Value::Float(f32::MIN.into()),
            FieldType::F64 => Value::Float(f64::MIN),
            FieldType::Chars(_) => Value::Text(String::new()),
            FieldType::Pad(_) => unreachable!(),
        });
    }

    #[test]
    fn every_fixed_layout_round_trips_maximums() {
        round_trip_fixed_layouts(|ty| match ty {
            FieldType::I32 => Value::Int(i32::MAX.into()),
            FieldType::I64 => Value::Int(i64::MAX),
            FieldType::U8 => Value::UInt(u8::MAX.into()),
            FieldType::U16 => Value::UInt(u16::MAX.into()),
            FieldType::U32 => Value::UInt(u32::MAX.into()),
            FieldType::U64 => Value::UInt(u64::MAX),
            FieldType::F32 => Value::Float(f32::MAX.into()),
            FieldType::F64 => Value::Float(f64::MAX),
            FieldType::Chars(n) => Value::Text("x".repeat(n)),
            FieldType::Pad(_) => unreachable!(),
        });
    }

    #[test]
    fn signed_range_is_pinned_at_both_ends() {
        let ok = |v: i64| encode(EventKind::WindowResize, args![v, 0i32]);
        assert!(ok(i32::MIN.into()).is_ok());
        assert!(ok(i32::MAX.into()).is_ok());
        assert!(matches!(
            ok(i64::from(i32::MIN) - 1),
            Err(EncodeError::OutOfRange { field: "w", .. })
        ));
        assert!(matches!(
            ok(i64::from(i32::MAX) + 1),
            Err(EncodeError::OutOfRange { field: "w", .. })
        ));

        assert!(encode(EventKind::SpriteRemove, args![i64::MIN, i64::MAX]).is_ok());
        assert!(matches!(
            encode(EventKind::SpriteRemove, args![0i64, i64::MAX as u64 + 1]),
            Err(EncodeError::OutOfRange { field: "id2", .. })
        ));
    }

    #[test]
    fn variable_text_add_round_trip() {
        let font = "fonts/Roboto.ttf";
        let text = "héllo";
        let bytes = encode(
            EventKind::TextAdd,
            args![
                5i64, 6i64, 1.0, 2.0, 3.0, 255u8, 0u8, 0u8, 255u8, 24.0f32,
                font.len() as u32, text.len() as u32, font, text
            ],
        )
        .unwrap();
        assert_eq!(bytes.len(), EVENT_HEADER_SIZE + 64 + font.len() + text.len());

        let event = decode(&bytes).unwrap();
        assert_eq!(event.get("fontPath"), Some(&Value::Text(font.into())));
        assert_eq!(event.get("text"), Some(&Value::Text(text.into())));
        assert_eq!(event.get("textLength"), Some(&Value::UInt(text.len() as u64)));
    }

    #[test]
    fn window_title_is_nul_padded() {
        let bytes = encode(EventKind::WindowTitle, args!["Game"]).unwrap();
        assert_eq!(bytes.len(), EVENT_HEADER_SIZE + 256);
        assert_eq!(&bytes[12..16], b"Game");
        assert!(bytes[16..].iter().all(|&b| b == 0));

        let event = decode(&bytes).unwrap();
        assert_eq!(event.get("title"), Some(&Value::Text("Game".into())));
    }

    #[test]
    fn title_too_long() {
        let err = encode(EventKind::WindowTitle, args!["x".repeat(257)]).unwrap_err();
        assert!(matches!(err, EncodeError::TooLong { len: 257, max: 256, .. }));
        assert!(encode(EventKind::WindowTitle, args!["x".repeat(256)]).is_ok());
    }

    #[test]
    fn arity_and_type_errors() {
        assert!(matches!(
            encode(EventKind::SpriteRemove, args![1i64]),
            Err(EncodeError::Arity { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            encode(EventKind::SpriteRemove, args![1i64, "two"]),
            Err(EncodeError::Type { field: "id2", .. })
        ));
        assert!(matches!(
            encode(EventKind::SpriteMove, args![1i64, 2i64, 0.0, "y", 0.0]),
            Err(EncodeError::Type { field: "positionY", .. })
        ));
    }

    #[test]
    fn integer_range_is_checked() {
        assert!(matches!(
            encode(EventKind::SpriteColor, args![1i64, 2i64, 256u32, 0u8, 0u8, 0u8]),
            Err(EncodeError::OutOfRange { field: "r", .. })
        ));
        assert!(matches!(
            encode(EventKind::AudioPlay, args![-1i64]),
            Err(EncodeError::OutOfRange { field: "audioId", .. })
        ));
        assert!(matches!(
            encode(EventKind::SpriteRemove, args![u64::MAX, 0i64]),
            Err(EncodeError::OutOfRange { field: "id1", .. })
        ));
    }

    #[test]
    fn ints_are_accepted_for_floats() {
        let bytes = encode(EventKind::CameraSetZoom, args![2i64]).unwrap();
        assert_eq!(&bytes[12..], &2.0f64.to_le_bytes());
    }

    #[test]
    fn segment_length_must_match() {
        let err = encode(EventKind::AudioLoad, args![3u32, "boom.wav"]).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::LengthMismatch {
                field: "pathLength",
                declared: 3,
                actual: 8,
                ..
            }
        ));
    }

    #[test]
    fn segment_accepts_raw_bytes() {
        let bytes = encode(EventKind::AudioLoad, args![2u32, vec![b'o', b'k']]).unwrap();
        assert_eq!(&bytes[12..], &[2, 0, 0, 0, b'o', b'k']);
    }

    #[test]
    fn empty_layout_writes_single_zero_byte() {
        let bytes = encode(EventKind::AudioStopAll, args![]).unwrap();
        assert_eq!(bytes.len(), EVENT_HEADER_SIZE + 1);
        assert_eq!(bytes[12], 0);
        assert!(decode(&bytes).unwrap().fields.is_empty());
    }

    #[test]
    fn invalid_utf8_segment_is_a_decode_error() {
        let mut bytes = encode(EventKind::AudioLoad, args![2u32, vec![0xffu8, 0xfe]]).unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::TextDecode { field: "path", offset: 16, .. })
        ));
        bytes.truncate(17);
        assert!(matches!(decode(&bytes), Err(DecodeError::Truncated { .. })));
    }
}
