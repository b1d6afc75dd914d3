//! Public library API for encoding, decoding, and inspecting NBT tag streams.

/// Tag model, codec engines, field mapping, compression, and dump helpers.
pub mod nbt;
