use serde::{Serialize, Serializer};

macro_rules! event_kinds {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        /// Integer code identifying a command or event type on the wire.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum EventKind {
            $($variant = $code,)+
        }

        impl EventKind {
            /// Every kind, in ascending code order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant,)+];

            /// Look up a wire code. `None` for codes outside the catalog.
            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(EventKind::$variant),)+
                    _ => None,
                }
            }

            /// Upper-case protocol name, e.g. `SPRITE_ADD`.
            pub fn name(self) -> &'static str {
                match self {
                    $(EventKind::$variant => $name,)+
                }
            }

            /// Parse an upper-case protocol name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(EventKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

event_kinds! {
    SpriteAdd = 0 => "SPRITE_ADD",
    SpriteRemove = 1 => "SPRITE_REMOVE",
    SpriteMove = 2 => "SPRITE_MOVE",
    SpriteScale = 3 => "SPRITE_SCALE",
    SpriteResize = 4 => "SPRITE_RESIZE",
    SpriteRotate = 5 => "SPRITE_ROTATE",
    SpriteColor = 6 => "SPRITE_COLOR",
    SpriteSpeed = 7 => "SPRITE_SPEED",
    SpriteTextureLoad = 8 => "SPRITE_TEXTURE_LOAD",
    SpriteTextureSet = 9 => "SPRITE_TEXTURE_SET",
    SpriteSetSourceRect = 10 => "SPRITE_SET_SOURCE_RECT",

    GeomAddPoint = 50 => "GEOM_ADD_POINT",
    GeomAddLine = 51 => "GEOM_ADD_LINE",
    GeomAddRect = 52 => "GEOM_ADD_RECT",
    GeomAddFillRect = 53 => "GEOM_ADD_FILL_RECT",
    GeomAddPacked = 54 => "GEOM_ADD_PACKED",
    GeomRemove = 55 => "GEOM_REMOVE",
    GeomSetColor = 56 => "GEOM_SET_COLOR",

    InputKeyup = 100 => "INPUT_KEYUP",
    InputKeydown = 101 => "INPUT_KEYDOWN",
    InputMouseup = 102 => "INPUT_MOUSEUP",
    InputMousedown = 103 => "INPUT_MOUSEDOWN",
    InputMousemotion = 104 => "INPUT_MOUSEMOTION",

    WindowTitle = 200 => "WINDOW_TITLE",
    WindowResize = 201 => "WINDOW_RESIZE",
    WindowFlags = 202 => "WINDOW_FLAGS",

    TextAdd = 300 => "TEXT_ADD",
    TextSetString = 301 => "TEXT_SET_STRING",

    AudioLoad = 400 => "AUDIO_LOAD",
    AudioLoaded = 401 => "AUDIO_LOADED",
    AudioPlay = 402 => "AUDIO_PLAY",
    AudioStopAll = 403 => "AUDIO_STOP_ALL",
    AudioSetMasterVolume = 404 => "AUDIO_SET_MASTER_VOLUME",
    AudioPause = 405 => "AUDIO_PAUSE",
    AudioStop = 406 => "AUDIO_STOP",
    AudioUnload = 407 => "AUDIO_UNLOAD",
    AudioSetVolume = 408 => "AUDIO_SET_VOLUME",

    PhysicsAddBody = 500 => "PHYSICS_ADD_BODY",
    PhysicsRemoveBody = 501 => "PHYSICS_REMOVE_BODY",
    PhysicsApplyForce = 502 => "PHYSICS_APPLY_FORCE",
    PhysicsApplyImpulse = 503 => "PHYSICS_APPLY_IMPULSE",
    PhysicsSetVelocity = 504 => "PHYSICS_SET_VELOCITY",
    PhysicsSetPosition = 505 => "PHYSICS_SET_POSITION",
    PhysicsSetRotation = 506 => "PHYSICS_SET_ROTATION",
    PhysicsSetDebugMode = 507 => "PHYSICS_SET_DEBUG_MODE",
    PhysicsCollisionBegin = 550 => "PHYSICS_COLLISION_BEGIN",
    PhysicsCollisionSeparate = 551 => "PHYSICS_COLLISION_SEPARATE",
    PhysicsSyncTransform = 552 => "PHYSICS_SYNC_TRANSFORM",

    Plugin = 1000 => "PLUGIN",
    PluginLoad = 1001 => "PLUGIN_LOAD",
    PluginUnload = 1002 => "PLUGIN_UNLOAD",
    PluginSet = 1003 => "PLUGIN_SET",
    PluginEventStacking = 1004 => "PLUGIN_EVENT_STACKING",
    PluginSubscribeEvent = 1005 => "PLUGIN_SUBSCRIBE_EVENT",
    PluginUnsubscribeEvent = 1006 => "PLUGIN_UNSUBSCRIBE_EVENT",

    CameraSetPosition = 2000 => "CAMERA_SET_POSITION",
    CameraMove = 2001 => "CAMERA_MOVE",
    CameraSetZoom = 2002 => "CAMERA_SET_ZOOM",
    CameraSetRotation = 2003 => "CAMERA_SET_ROTATION",
    CameraFollowEntity = 2004 => "CAMERA_FOLLOW_ENTITY",
    CameraStopFollowing = 2005 => "CAMERA_STOP_FOLLOWING",

    ScriptSubscribe = 3000 => "SCRIPT_SUBSCRIBE",
    ScriptUnsubscribe = 3001 => "SCRIPT_UNSUBSCRIBE",
}

impl EventKind {
    /// Wire code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_code(kind.code()), Some(*kind));
            assert_eq!(EventKind::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn all_is_sorted_and_unique() {
        let codes: Vec<u32> = EventKind::ALL.iter().map(|k| k.code()).collect();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(codes.len(), 63);
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(EventKind::from_code(11), None);
        assert_eq!(EventKind::from_code(9999), None);
        assert_eq!(EventKind::from_name("SPRITE_EXPLODE"), None);
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(EventKind::SpriteRemove.code(), 1);
        assert_eq!(EventKind::WindowTitle.code(), 200);
        assert_eq!(EventKind::PhysicsSyncTransform.code(), 552);
        assert_eq!(EventKind::ScriptUnsubscribe.to_string(), "SCRIPT_UNSUBSCRIBE");
    }
}
