pub mod auth;
pub mod bls;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod models;
pub mod resumes;
pub mod routes;
pub mod seo;
pub mod state;
pub mod storage;
