//! Backend collaborator.
//!
//! - [`Backend`]: the logical operations the game needs from its backend
//! - [`RunnerApi`]: HTTP implementation on top of the retrying [`HttpClient`]
//! - [`Collaborator`]: bounds every call and substitutes fallback data

mod api;
mod backend;
mod client;
mod collaborator;

pub use api::RunnerApi;
pub use backend::*;
pub use client::HttpClient;
pub use collaborator::Collaborator;

#[cfg(test)]
pub(crate) use collaborator::tests::FakeBackend;
