pub mod validate;

pub use validate::{is_alpha_numeric_underscore, is_one_of, type_name};
