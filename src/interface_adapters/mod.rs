pub mod clients;
pub mod gate;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
