pub mod a2a;
pub mod events;
pub mod types;
