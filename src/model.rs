use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The curve fitted to a measurement series
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitModel {
    /// $y = m x + b$
    #[default]
    #[serde(alias = "lineal")]
    Linear,
    /// $y = A x^n$, fitted as $\ln y = \ln A + n \ln x$
    #[serde(alias = "power", alias = "potencial")]
    PowerLaw,
    /// $y = A e^{b x}$, fitted as $\ln y = \ln A + b x$
    #[serde(alias = "exponencial")]
    Exponential,
}

/// Rectilinear motion the measurements are assumed to describe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionType {
    /// Uniform rectilinear motion (MRU)
    #[serde(alias = "MRU", alias = "mru")]
    Uniform,
    /// Uniformly accelerated rectilinear motion (MRUA)
    #[serde(alias = "MRUA", alias = "mrua")]
    Accelerated,
}

/// Which kinematic quantity is plotted against time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KinematicVariable {
    #[serde(alias = "x-t")]
    PositionTime,
    #[serde(alias = "v-t")]
    VelocityTime,
    #[serde(alias = "a-t")]
    AccelerationTime,
}

/// Whether the selectors call for the three parameter fit $x = x_0 + v_0 t + \frac{1}{2} a t^2$
pub fn uses_quadratic_fit(
    model: FitModel,
    motion: Option<MotionType>,
    variable: Option<KinematicVariable>,
) -> bool {
    model == FitModel::PowerLaw
        && motion == Some(MotionType::Accelerated)
        && variable == Some(KinematicVariable::PositionTime)
}

/// Whether the selectors call for the linearized fit of $x$ against $t^2$
pub fn uses_squared_time(
    model: FitModel,
    motion: Option<MotionType>,
    variable: Option<KinematicVariable>,
) -> bool {
    model == FitModel::Linear
        && motion == Some(MotionType::Accelerated)
        && variable == Some(KinematicVariable::PositionTime)
}

impl FromStr for FitModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" | "lineal" => Ok(Self::Linear),
            "power" | "power-law" | "potencial" => Ok(Self::PowerLaw),
            "exponential" | "exponencial" => Ok(Self::Exponential),
            _ => Err(Error::UnsupportedModel(s.to_owned())),
        }
    }
}

impl FromStr for MotionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "mru" => Ok(Self::Uniform),
            "accelerated" | "mrua" => Ok(Self::Accelerated),
            _ => Err(Error::UnsupportedMotion(s.to_owned())),
        }
    }
}

impl FromStr for KinematicVariable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "position-time" | "x-t" => Ok(Self::PositionTime),
            "velocity-time" | "v-t" => Ok(Self::VelocityTime),
            "acceleration-time" | "a-t" => Ok(Self::AccelerationTime),
            _ => Err(Error::UnsupportedVariable(s.to_owned())),
        }
    }
}

impl fmt::Display for FitModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::PowerLaw => write!(f, "power-law"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{uses_quadratic_fit, uses_squared_time, FitModel, KinematicVariable, MotionType};

    #[test]
    fn selectors_parse_from_english_and_spanish_names() {
        assert_eq!("linear".parse::<FitModel>().unwrap(), FitModel::Linear);
        assert_eq!("potencial".parse::<FitModel>().unwrap(), FitModel::PowerLaw);
        assert_eq!("Exponencial".parse::<FitModel>().unwrap(), FitModel::Exponential);
        assert_eq!("MRUA".parse::<MotionType>().unwrap(), MotionType::Accelerated);
        assert_eq!(
            "v-t".parse::<KinematicVariable>().unwrap(),
            KinematicVariable::VelocityTime
        );
    }

    #[test]
    fn unknown_model_is_a_configuration_error() {
        let error = "cubic".parse::<FitModel>().unwrap_err();
        assert!(error.is_config_error());
        assert_eq!(error.to_string(), "unsupported fit model: cubic");
    }

    #[test]
    fn special_kinematic_paths_need_accelerated_position_time() {
        let motion = Some(MotionType::Accelerated);
        let variable = Some(KinematicVariable::PositionTime);

        assert!(uses_quadratic_fit(FitModel::PowerLaw, motion, variable));
        assert!(!uses_quadratic_fit(FitModel::Linear, motion, variable));
        assert!(!uses_quadratic_fit(
            FitModel::PowerLaw,
            Some(MotionType::Uniform),
            variable
        ));
        assert!(!uses_quadratic_fit(FitModel::PowerLaw, motion, None));

        assert!(uses_squared_time(FitModel::Linear, motion, variable));
        assert!(!uses_squared_time(
            FitModel::Linear,
            motion,
            Some(KinematicVariable::VelocityTime)
        ));
    }

    #[test]
    fn selectors_deserialize_with_aliases() {
        #[derive(serde::Deserialize)]
        struct Selectors {
            model: FitModel,
            motion: MotionType,
            variable: KinematicVariable,
        }

        let selectors: Selectors =
            toml::from_str("model = \"power\"\nmotion = \"MRU\"\nvariable = \"x-t\"").unwrap();
        assert_eq!(selectors.model, FitModel::PowerLaw);
        assert_eq!(selectors.motion, MotionType::Uniform);
        assert_eq!(selectors.variable, KinematicVariable::PositionTime);
    }
}
