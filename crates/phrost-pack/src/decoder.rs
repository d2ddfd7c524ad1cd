use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::codec::{decode_event, Reader};
use crate::error::DecodeError;
use crate::id::EntityId;
use crate::kind::EventKind;
use crate::value::Value;

/// One event read back from a blob.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub kind: EventKind,
    /// Reserved; zero from every current producer.
    pub timestamp: u64,
    /// Named fields in layout order, padding omitted, segments last.
    pub fields: Vec<(&'static str, Value)>,
}

impl DecodedEvent {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// The `id1`/`id2` pair, when the layout carries one.
    pub fn entity_id(&self) -> Option<EntityId> {
        let id1 = self.get("id1")?.as_i64()?;
        let id2 = self.get("id2")?.as_i64()?;
        Some(EntityId::from_signed(id1, id2))
    }
}

impl Serialize for DecodedEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry("type", &self.kind.code())?;
        map.serialize_entry("name", self.kind.name())?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of decoding a command blob.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unpacked {
    /// Every event decoded before `halted` (or all of them).
    pub events: Vec<DecodedEvent>,
    /// Event count from the blob prefix; 0 for an empty blob.
    pub declared: u32,
    /// Why decoding stopped early, if it did.
    pub halted: Option<DecodeError>,
}

impl Unpacked {
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }

    /// The events, or the halt reason if decoding stopped early.
    pub fn into_result(self) -> Result<Vec<DecodedEvent>, DecodeError> {
        match self.halted {
            Some(err) => Err(err),
            None => Ok(self.events),
        }
    }
}

/// Decode a command blob (`u32 count` + events).
///
/// Decoding stops at the first unknown kind, short read, or invalid text;
/// everything decoded up to that point is returned together with the reason.
/// A zero-length blob is the empty blob: no events, no error. Bytes after the
/// last declared event are ignored.
pub fn unpack(blob: &[u8]) -> Unpacked {
    let mut unpacked = Unpacked::default();
    if blob.is_empty() {
        return unpacked;
    }

    let mut reader = Reader::new(blob);
    let count = match reader.u32() {
        Ok(count) => count,
        Err(err) => {
            warn!(%err, len = blob.len(), "command blob too short for its count");
            unpacked.halted = Some(err);
            return unpacked;
        }
    };
    unpacked.declared = count;

    for index in 0..count {
        match decode_event(&mut reader) {
            Ok(event) => unpacked.events.push(event),
            Err(err) => {
                warn!(%err, index, declared = count, "event decoding halted");
                unpacked.halted = Some(err);
                break;
            }
        }
    }
    unpacked
}
