//! # markethub-push
//!
//! Push delivery gateway for MarketHub. Implements the
//! [`PushSender`](markethub_core::traits::PushSender) trait over the FCM
//! HTTP v1 API: service-account credential loading, OAuth2 bearer-token
//! exchange with caching, multicast send with independent per-token
//! outcomes, and transient-vs-permanent failure classification.

pub mod classify;
pub mod client;
pub mod credentials;

pub use classify::ErrorClassifier;
pub use client::FcmClient;
pub use credentials::ServiceAccountKey;
