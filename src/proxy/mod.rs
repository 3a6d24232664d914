//! Thin proxies to third-party HTTP APIs. Stateless handlers that forward one
//! outbound call each and relay the upstream response; transport failures
//! surface as structured upstream errors rather than being swallowed.

pub mod clarifai;
pub mod instagram;

pub use clarifai::ClarifaiClient;
pub use instagram::InstagramClient;
