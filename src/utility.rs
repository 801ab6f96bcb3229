pub mod source;
pub mod str;
pub mod zip;
