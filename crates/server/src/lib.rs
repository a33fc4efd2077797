pub mod bootstrap;
pub mod page;
pub mod routes;
