//! PM2.5 prediction and Air Quality Index toolkit.
//!
//! The core is [`aqi::compute_aqi`]; the other modules feed it (model
//! inference, history exports, weather) or present its results.

pub mod analysis;
pub mod aqi;
pub mod config;
pub mod fetch;
pub mod model;
pub mod output;
pub mod prediction;
pub mod weather;
