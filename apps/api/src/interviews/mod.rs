// Interview lookups and listings.

pub mod handlers;
pub mod repository;
