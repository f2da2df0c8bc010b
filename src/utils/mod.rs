pub mod date_format;
pub mod sequence;
