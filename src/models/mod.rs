pub mod activity;
pub mod anchor;
pub mod attribute;
pub mod extra_data;
pub mod profile;
pub mod receipt;
pub mod wire;
