pub mod context;
pub mod normalizer;
pub mod replay;
pub mod types;

pub use context::{normalize_app_key, AppContext, UNKNOWN_APP};
pub use normalizer::Normalizer;
pub use types::{
    EventCategory, Key, Modifiers, MouseButton, NormalizedEvent, RawEventKind, RawInputEvent,
};
