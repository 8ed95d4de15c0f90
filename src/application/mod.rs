// Application layer - Use cases over the lab data service
pub mod attribute_service;
pub mod graph_service;
pub mod lab_repository;
pub mod workspace;
