//! Static binary layout of every event kind.
//!
//! All layouts are little-endian and unaligned. Padding bytes are written as
//! zero and skipped on read. Field names live next to their types so that the
//! name table and the layout cannot drift apart.

use serde::Serialize;

use crate::kind::EventKind;

/// Primitive type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Fixed-size byte array holding NUL-padded text.
    Chars(usize),
    /// Zero-filled padding.
    Pad(usize),
}

impl FieldType {
    /// Width on the wire in bytes.
    pub const fn width(self) -> usize {
        match self {
            FieldType::U8 => 1,
            FieldType::U16 => 2,
            FieldType::I32 | FieldType::U32 | FieldType::F32 => 4,
            FieldType::I64 | FieldType::U64 | FieldType::F64 => 8,
            FieldType::Chars(n) | FieldType::Pad(n) => n,
        }
    }

    pub const fn is_pad(self) -> bool {
        matches!(self, FieldType::Pad(_))
    }

    /// Short type label used in diagnostics and the catalog listing.
    pub fn label(self) -> String {
        match self {
            FieldType::I32 => "i32".into(),
            FieldType::I64 => "i64".into(),
            FieldType::U8 => "u8".into(),
            FieldType::U16 => "u16".into(),
            FieldType::U32 => "u32".into(),
            FieldType::U64 => "u64".into(),
            FieldType::F32 => "f32".into(),
            FieldType::F64 => "f64".into(),
            FieldType::Chars(n) => format!("char[{n}]"),
            FieldType::Pad(n) => format!("pad[{n}]"),
        }
    }
}

/// A named field. Padding fields have an empty name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// Raw byte run that follows a variable layout's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub name: &'static str,
    /// Header field holding this segment's byte length.
    pub length_field: &'static str,
}

/// Binary layout of one event kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Layout {
    Fixed {
        fields: &'static [Field],
        size: usize,
    },
    Variable {
        header: &'static [Field],
        header_size: usize,
        segments: &'static [Segment],
    },
}

impl Layout {
    pub fn is_variable(&self) -> bool {
        matches!(self, Layout::Variable { .. })
    }

    /// Fixed payload size, or the header size of a variable layout.
    pub fn size(&self) -> usize {
        match self {
            Layout::Fixed { size, .. } => *size,
            Layout::Variable { header_size, .. } => *header_size,
        }
    }

    /// The fixed fields, or the header fields of a variable layout.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Layout::Fixed { fields, .. } => fields,
            Layout::Variable { header, .. } => header,
        }
    }

    pub fn segments(&self) -> &'static [Segment] {
        match self {
            Layout::Fixed { .. } => &[],
            Layout::Variable { segments, .. } => segments,
        }
    }

    /// Number of caller arguments: non-padding fields plus one per segment.
    pub fn arg_count(&self) -> usize {
        self.fields().iter().filter(|f| !f.ty.is_pad()).count() + self.segments().len()
    }

    /// Argument names in positional order.
    pub fn arg_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields()
            .iter()
            .filter(|f| !f.ty.is_pad())
            .map(|f| f.name)
            .chain(self.segments().iter().map(|s| s.name))
    }
}

/// Layout for `kind`. Total: every kind has exactly one layout.
pub fn layout_for(kind: EventKind) -> &'static Layout {
    use EventKind::*;
    match kind {
        SpriteAdd => &SPRITE_ADD,
        SpriteRemove | GeomRemove | PhysicsRemoveBody | CameraFollowEntity => &ID_ONLY,
        SpriteMove => &SPRITE_MOVE,
        SpriteScale => &SPRITE_SCALE,
        SpriteResize => &SPRITE_RESIZE,
        SpriteRotate => &SPRITE_ROTATE,
        SpriteColor | GeomSetColor => &ID_COLOR,
        SpriteSpeed => &SPRITE_SPEED,
        SpriteTextureLoad => &SPRITE_TEXTURE_LOAD,
        SpriteTextureSet => &SPRITE_TEXTURE_SET,
        SpriteSetSourceRect => &SPRITE_SET_SOURCE_RECT,

        GeomAddPoint => &GEOM_ADD_POINT,
        GeomAddLine => &GEOM_ADD_LINE,
        GeomAddRect | GeomAddFillRect => &GEOM_ADD_RECT,
        GeomAddPacked => &GEOM_ADD_PACKED,

        InputKeyup | InputKeydown => &INPUT_KEY,
        InputMouseup | InputMousedown => &INPUT_MOUSE_BUTTON,
        InputMousemotion => &INPUT_MOUSEMOTION,

        WindowTitle => &WINDOW_TITLE,
        WindowResize => &WINDOW_RESIZE,
        WindowFlags => &WINDOW_FLAGS,

        TextAdd => &TEXT_ADD,
        TextSetString => &TEXT_SET_STRING,

        AudioLoad => &AUDIO_LOAD,
        AudioLoaded | AudioPlay | AudioPause | AudioStop | AudioUnload => &AUDIO_ID,
        AudioStopAll | CameraStopFollowing => &EMPTY,
        AudioSetMasterVolume => &AUDIO_SET_MASTER_VOLUME,
        AudioSetVolume => &AUDIO_SET_VOLUME,

        PhysicsAddBody => &PHYSICS_ADD_BODY,
        PhysicsApplyForce => &PHYSICS_APPLY_FORCE,
        PhysicsApplyImpulse => &PHYSICS_APPLY_IMPULSE,
        PhysicsSetVelocity => &PHYSICS_SET_VELOCITY,
        PhysicsSetPosition => &PHYSICS_SET_POSITION,
        PhysicsSetRotation => &PHYSICS_SET_ROTATION,
        PhysicsSetDebugMode => &PHYSICS_SET_DEBUG_MODE,
        PhysicsCollisionBegin | PhysicsCollisionSeparate => &PHYSICS_COLLISION,
        PhysicsSyncTransform => &PHYSICS_SYNC_TRANSFORM,

        Plugin => &PLUGIN,
        PluginLoad => &PLUGIN_LOAD,
        PluginUnload | PluginSet => &PLUGIN_ID,
        PluginEventStacking => &PLUGIN_EVENT_STACKING,
        PluginSubscribeEvent | PluginUnsubscribeEvent => &PLUGIN_SUBSCRIPTION,

        CameraSetPosition => &CAMERA_SET_POSITION,
        CameraMove => &CAMERA_MOVE,
        CameraSetZoom => &CAMERA_SET_ZOOM,
        CameraSetRotation => &CAMERA_SET_ROTATION,

        ScriptSubscribe | ScriptUnsubscribe => &SCRIPT_SUBSCRIPTION,
    }
}

/// Layout for a raw wire code, `None` when the code is not in the catalog.
pub fn layout_for_code(code: u32) -> Option<(EventKind, &'static Layout)> {
    EventKind::from_code(code).map(|kind| (kind, layout_for(kind)))
}

/// Every kind with its layout, in ascending code order.
pub fn entries() -> impl Iterator<Item = (EventKind, &'static Layout)> {
    EventKind::ALL.iter().map(|&kind| (kind, layout_for(kind)))
}

use FieldType::{Chars, Pad, F32, F64, I32, I64, U16, U32, U64, U8};

const fn field(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty }
}

const fn pad(n: usize) -> Field {
    field("", Pad(n))
}

const fn seg(name: &'static str, length_field: &'static str) -> Segment {
    Segment { name, length_field }
}

static EMPTY: Layout = Layout::Fixed {
    fields: &[pad(1)],
    size: 1,
};

static ID_ONLY: Layout = Layout::Fixed {
    fields: &[field("id1", I64), field("id2", I64)],
    size: 16,
};

static ID_COLOR: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        pad(4),
    ],
    size: 24,
};

static SPRITE_ADD: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("positionX", F64),
        field("positionY", F64),
        field("positionZ", F64),
        field("scaleX", F64),
        field("scaleY", F64),
        field("scaleZ", F64),
        field("sizeW", F64),
        field("sizeH", F64),
        field("rotationX", F64),
        field("rotationY", F64),
        field("rotationZ", F64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        pad(4),
        field("speedX", F64),
        field("speedY", F64),
    ],
    size: 128,
};

static SPRITE_MOVE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("positionX", F64),
        field("positionY", F64),
        field("positionZ", F64),
    ],
    size: 40,
};

static SPRITE_SCALE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("scaleX", F64),
        field("scaleY", F64),
        field("scaleZ", F64),
    ],
    size: 40,
};

static SPRITE_RESIZE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("sizeW", F64),
        field("sizeH", F64),
    ],
    size: 32,
};

static SPRITE_ROTATE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("rotationX", F64),
        field("rotationY", F64),
        field("rotationZ", F64),
    ],
    size: 40,
};

static SPRITE_SPEED: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("speedX", F64),
        field("speedY", F64),
    ],
    size: 32,
};

static SPRITE_TEXTURE_LOAD: Layout = Layout::Variable {
    header: &[
        field("id1", I64),
        field("id2", I64),
        field("filenameLength", U32),
        pad(4),
    ],
    header_size: 24,
    segments: &[seg("filename", "filenameLength")],
};

static SPRITE_TEXTURE_SET: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("textureId", U64),
    ],
    size: 24,
};

static SPRITE_SET_SOURCE_RECT: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("x", F32),
        field("y", F32),
        field("w", F32),
        field("h", F32),
    ],
    size: 32,
};

static GEOM_ADD_POINT: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("z", F64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        field("isScreenSpace", U8),
        pad(3),
        field("x", F32),
        field("y", F32),
    ],
    size: 40,
};

static GEOM_ADD_LINE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("z", F64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        field("isScreenSpace", U8),
        pad(3),
        field("x1", F32),
        field("y1", F32),
        field("x2", F32),
        field("y2", F32),
    ],
    size: 48,
};

static GEOM_ADD_RECT: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("z", F64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        field("isScreenSpace", U8),
        pad(3),
        field("x", F32),
        field("y", F32),
        field("w", F32),
        field("h", F32),
    ],
    size: 48,
};

// 39 bytes: the engine reads this one unpadded.
static GEOM_ADD_PACKED: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("z", F64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        field("isScreenSpace", U8),
        pad(2),
        field("primitiveType", U32),
        field("count", U32),
    ],
    size: 39,
};

static INPUT_KEY: Layout = Layout::Fixed {
    fields: &[
        field("scancode", I32),
        field("keycode", U32),
        field("mod", U16),
        field("isRepeat", U8),
        pad(1),
    ],
    size: 12,
};

static INPUT_MOUSE_BUTTON: Layout = Layout::Fixed {
    fields: &[
        field("x", F32),
        field("y", F32),
        field("button", U8),
        field("clicks", U8),
        pad(2),
    ],
    size: 12,
};

static INPUT_MOUSEMOTION: Layout = Layout::Fixed {
    fields: &[
        field("x", F32),
        field("y", F32),
        field("xrel", F32),
        field("yrel", F32),
    ],
    size: 16,
};

static WINDOW_TITLE: Layout = Layout::Fixed {
    fields: &[field("title", Chars(256))],
    size: 256,
};

static WINDOW_RESIZE: Layout = Layout::Fixed {
    fields: &[field("w", I32), field("h", I32)],
    size: 8,
};

static WINDOW_FLAGS: Layout = Layout::Fixed {
    fields: &[field("flags", U64)],
    size: 8,
};

static TEXT_ADD: Layout = Layout::Variable {
    header: &[
        field("id1", I64),
        field("id2", I64),
        field("positionX", F64),
        field("positionY", F64),
        field("positionZ", F64),
        field("r", U8),
        field("g", U8),
        field("b", U8),
        field("a", U8),
        pad(4),
        field("fontSize", F32),
        field("fontPathLength", U32),
        field("textLength", U32),
        pad(4),
    ],
    header_size: 64,
    segments: &[
        seg("fontPath", "fontPathLength"),
        seg("text", "textLength"),
    ],
};

static TEXT_SET_STRING: Layout = Layout::Variable {
    header: &[
        field("id1", I64),
        field("id2", I64),
        field("textLength", U32),
        pad(4),
    ],
    header_size: 24,
    segments: &[seg("text", "textLength")],
};

static AUDIO_LOAD: Layout = Layout::Variable {
    header: &[field("pathLength", U32)],
    header_size: 4,
    segments: &[seg("path", "pathLength")],
};

static AUDIO_ID: Layout = Layout::Fixed {
    fields: &[field("audioId", U64)],
    size: 8,
};

static AUDIO_SET_MASTER_VOLUME: Layout = Layout::Fixed {
    fields: &[field("volume", F32)],
    size: 4,
};

static AUDIO_SET_VOLUME: Layout = Layout::Fixed {
    fields: &[field("audioId", U64), field("volume", F32), pad(4)],
    size: 16,
};

static PHYSICS_ADD_BODY: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("positionX", F64),
        field("positionY", F64),
        field("bodyType", U8),
        field("shapeType", U8),
        field("lockRotation", U8),
        pad(5),
        field("mass", F64),
        field("friction", F64),
        field("elasticity", F64),
        field("width", F64),
        field("height", F64),
    ],
    size: 80,
};

static PHYSICS_APPLY_FORCE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("forceX", F64),
        field("forceY", F64),
    ],
    size: 32,
};

static PHYSICS_APPLY_IMPULSE: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("impulseX", F64),
        field("impulseY", F64),
    ],
    size: 32,
};

static PHYSICS_SET_VELOCITY: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("velocityX", F64),
        field("velocityY", F64),
    ],
    size: 32,
};

static PHYSICS_SET_POSITION: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("positionX", F64),
        field("positionY", F64),
    ],
    size: 32,
};

static PHYSICS_SET_ROTATION: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("angleInRadians", F64),
    ],
    size: 24,
};

static PHYSICS_SET_DEBUG_MODE: Layout = Layout::Fixed {
    fields: &[field("enabled", U8), pad(3)],
    size: 4,
};

static PHYSICS_COLLISION: Layout = Layout::Fixed {
    fields: &[
        field("id1_A", I64),
        field("id2_A", I64),
        field("id1_B", I64),
        field("id2_B", I64),
    ],
    size: 32,
};

static PHYSICS_SYNC_TRANSFORM: Layout = Layout::Fixed {
    fields: &[
        field("id1", I64),
        field("id2", I64),
        field("positionX", F64),
        field("positionY", F64),
        field("angle", F64),
        field("velocityX", F64),
        field("velocityY", F64),
        field("angularVelocity", F64),
        field("isSleeping", U8),
        pad(7),
    ],
    size: 72,
};

static PLUGIN: Layout = Layout::Fixed {
    fields: &[field("eventId", U8)],
    size: 1,
};

static PLUGIN_LOAD: Layout = Layout::Variable {
    header: &[field("channelNo", U32), field("pathLength", U32)],
    header_size: 8,
    segments: &[seg("path", "pathLength")],
};

static PLUGIN_ID: Layout = Layout::Fixed {
    fields: &[field("pluginId", U8)],
    size: 1,
};

static PLUGIN_EVENT_STACKING: Layout = Layout::Fixed {
    fields: &[field("eventId", U8), pad(1)],
    size: 2,
};

static PLUGIN_SUBSCRIPTION: Layout = Layout::Fixed {
    fields: &[field("pluginId", U8), pad(3), field("channelNo", U32)],
    size: 8,
};

static CAMERA_SET_POSITION: Layout = Layout::Fixed {
    fields: &[field("positionX", F64), field("positionY", F64)],
    size: 16,
};

static CAMERA_MOVE: Layout = Layout::Fixed {
    fields: &[field("deltaX", F64), field("deltaY", F64)],
    size: 16,
};

static CAMERA_SET_ZOOM: Layout = Layout::Fixed {
    fields: &[field("zoom", F64)],
    size: 8,
};

static CAMERA_SET_ROTATION: Layout = Layout::Fixed {
    fields: &[field("angleInRadians", F64)],
    size: 8,
};

static SCRIPT_SUBSCRIPTION: Layout = Layout::Fixed {
    fields: &[field("channelNo", U32), pad(4)],
    size: 8,
};
