pub mod jis_x_0213;
pub mod ruby_txt;
pub mod utility;
