//! Public library API for decoding, re-building and flattening legacy `.3do` model files.

/// Binary codec: integer/record primitives, decoder, file map, layout builder and flattener.
pub mod codec;
