//! Toy pet store served under `/v1/pets`.
//!
//! # Data Flow
//! ```text
//! GET  /v1/pets        → handlers::list   → store.list(limit)
//! POST /v1/pets        → handlers::create → store.create(new pet)
//! GET  /v1/pets/{id}   → handlers::show   → store.get(id)
//! ```
//!
//! # Design Decisions
//! - In-memory only; restarting the server restores the seed data
//! - A readers/writer lock guards the store; lock hold times are tiny, so a
//!   blocking `std::sync::RwLock` is used rather than an async one

pub mod handlers;
pub mod store;

pub use handlers::routes;
pub use store::{NewPet, Pet, PetStore};
