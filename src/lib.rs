#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod goodness;
pub mod interpretation;
pub mod io;
pub mod linearize;
pub mod math;
pub mod model;
pub mod normality;
pub mod polyfit;
pub mod statistics;
pub mod student;
pub mod uncertainty;

pub use analysis::{analyse, Fit, FitData, FitResult, MeasurementSeries};
pub use config::AnalysisConfig;
pub use error::Error;
pub use model::{FitModel, KinematicVariable, MotionType};

pub type Result<T> = ::std::result::Result<T, Error>;
