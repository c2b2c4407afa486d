pub mod handlers;
pub mod machine;
pub mod mint;
pub mod routes;

pub use routes::create_router;
