pub mod events;
pub mod tips;
