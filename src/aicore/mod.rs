//! AI Core proxy
//!
//! The proxy context every provider needs before a model can be invoked:
//! OAuth credentials, resource group and deployment routing.

pub mod auth;
pub mod client;
pub mod deployments;

pub use auth::TokenManager;
pub use client::{AiCoreClient, RESOURCE_GROUP_HEADER};
