pub mod app;
mod deserializers;
pub mod errors;
mod extractors;
pub mod pagination;
pub mod quiz;
mod routes;
