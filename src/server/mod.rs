mod auth;
mod cards;
mod discover;
pub mod dto;
mod profile;
mod repository;
pub mod response;
mod router;
mod sets;
mod topics;
mod validation;

pub use router::{AppState, create_router};
