//! predlb-predictor
//!
//! Client for the remote LBD scoring service: sign-up, log-in, token
//! refresh, and probability prediction, plus eager onboarding of new users.
//!
//! Every transport or authentication failure is absorbed at the
//! [`ProbabilityPredictor`] boundary and surfaces as "no prediction".

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod flows;
pub mod onboarding;
pub mod predictor;

pub use predictor::{ApiPredictor, DisabledPredictor, ProbabilityPredictor, build_predictor};
