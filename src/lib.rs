#![doc = include_str!("../README.md")]

pub mod analytics;
pub mod app;
pub mod component;
pub mod logger;
pub mod util;

#[cfg(test)]
pub mod test_support;
