pub mod config;
pub mod inspect;
pub mod simulate;
