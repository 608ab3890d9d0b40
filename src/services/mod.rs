pub mod attribute_mapper;
pub mod crypto_utils;
pub mod profile_assembler;
pub mod wire_codec;
