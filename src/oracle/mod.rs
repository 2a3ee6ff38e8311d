mod client;

pub use client::{OracleClient, OracleConnector};
