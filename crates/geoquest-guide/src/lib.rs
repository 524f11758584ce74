//! AI guide for GeoQuest rounds.
//!
//! Players spend turns asking the guide about the panorama. The guide is a
//! Gemini model primed with the secret city and country; it must never say
//! the name outright. Every failure is turned into an in-character reply so a
//! question never aborts a round.

pub mod client;
pub mod error;
pub mod guide;
pub mod prompt;

mod types;

pub use client::GeminiClient;
pub use error::GuideError;
pub use guide::Guide;
pub use prompt::{build_prompt, HINT_QUESTION};
