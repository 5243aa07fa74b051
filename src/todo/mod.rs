pub mod data;
pub mod date;
pub mod endpoints;
pub mod error;
pub mod guards;
pub mod helpers;
