//! Entry construction: payload serialization and record assembly.

pub mod builder;
pub mod serializer;

pub use builder::EntryBuilder;
pub use serializer::EntrySerializer;
