pub mod access;
pub mod config;
pub mod errors;
pub mod keys;
pub mod policy;
pub mod routes;
pub mod secrets;
pub mod storage;
pub mod upload;
pub mod validator;
