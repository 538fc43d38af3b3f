use std::fmt::Write;

use crate::analysis::Fit;
use crate::math::{to_f64, FitScalar};
use crate::model::{KinematicVariable, MotionType};

const GENERIC: &str = "General metrological analysis without a specific physical interpretation.";

/// Describe the fitted parameters as a rectilinear motion
///
/// Without both a motion type and a kinematic variable only a generic sentence is produced.
/// For linear fits the slope and intercept take the role dictated by the plotted variable; for
/// uniformly accelerated position-time data a linear fit is read as $x$ against $t^2$, so the
/// acceleration is twice the slope.
pub fn physical_interpretation<E: FitScalar>(
    fit: &Fit<E>,
    motion: Option<MotionType>,
    variable: Option<KinematicVariable>,
) -> String {
    let (Some(motion), Some(variable)) = (motion, variable) else {
        return GENERIC.to_owned();
    };

    let mut text = String::new();
    match motion {
        MotionType::Uniform => {
            text.push_str("UNIFORM RECTILINEAR MOTION (MRU)\n\n");
            if let Fit::Linear(linear) = fit {
                let (m, b) = (to_f64(linear.slope.value), to_f64(linear.intercept.value));
                uniform(&mut text, variable, m, b);
            }
        }
        MotionType::Accelerated => {
            text.push_str("UNIFORMLY ACCELERATED RECTILINEAR MOTION (MRUA)\n\n");
            match fit {
                Fit::Quadratic(quadratic) => {
                    if variable == KinematicVariable::PositionTime {
                        accelerated_quadratic(
                            &mut text,
                            to_f64(quadratic.initial_position.value),
                            to_f64(quadratic.initial_velocity.value),
                            to_f64(quadratic.acceleration.value),
                        );
                    }
                }
                Fit::Linear(linear) => {
                    let (m, b) = (to_f64(linear.slope.value), to_f64(linear.intercept.value));
                    accelerated_linear(&mut text, variable, m, b);
                }
            }
        }
    }
    text
}

fn uniform(text: &mut String, variable: KinematicVariable, m: f64, b: f64) {
    match variable {
        KinematicVariable::PositionTime => {
            let _ = write!(
                text,
                "The equation of motion is: x(t) = x₀ + v·t\n\n\
                 • Initial position (x₀): {b:.3} m\n\
                 • Constant velocity (v): {m:.3} m/s\n\n\
                 The object moves with a constant velocity of {m:.3} m/s, \
                 starting from position {b:.3} m."
            );
        }
        KinematicVariable::VelocityTime => {
            let _ = write!(
                text,
                "In MRU the velocity is constant:\n\n\
                 • Constant velocity (v): {b:.3} m/s\n\
                 • Change in velocity: {m:.6} m/s² (≈ 0)\n\n\
                 A slope close to zero confirms there is no acceleration."
            );
        }
        KinematicVariable::AccelerationTime => {}
    }
}

fn accelerated_quadratic(text: &mut String, x0: f64, v0: f64, a: f64) {
    let half_a = 0.5 * a;
    let _ = write!(
        text,
        "The equation of motion is: x(t) = x₀ + v₀·t + ½a·t²\n\n\
         QUADRATIC POLYNOMIAL FIT\n\n\
         Full three parameter fit:\n\n\
         • Initial position (x₀): {x0:.3} m\n\
         • Initial velocity (v₀): {v0:.3} m/s\n\
         • Constant acceleration (a): {a:.3} m/s²\n\n\
         Complete equation:\n\
         x(t) = {x0:.3} + {v0:.3}·t + {half_a:.3}·t²\n\n\
         The object starts at x₀ = {x0:.3} m with initial velocity v₀ = {v0:.3} m/s \
         and accelerates uniformly at a = {a:.3} m/s²."
    );
    if x0.abs() < 1.0 {
        text.push_str("\nAn initial position close to zero is consistent with the reference origin.");
    }
    if v0.abs() < 0.1 {
        text.push_str("\nAn initial velocity close to zero indicates the object starts from rest.");
    }
}

fn accelerated_linear(text: &mut String, variable: KinematicVariable, m: f64, b: f64) {
    match variable {
        KinematicVariable::PositionTime => {
            // x = x0 + (a / 2) t^2
            let a = 2.0 * m;
            let _ = write!(
                text,
                "The equation of motion is: x(t) = x₀ + v₀·t + ½a·t²\n\n\
                 LINEARIZED ANALYSIS: x vs t²\n\n\
                 Linear fit performed: x = x₀ + (a/2)·t²\n\n\
                 • Initial position (x₀): {b:.3} m\n\
                 • Constant acceleration (a): {a:.3} m/s²\n  \
                 (computed as a = 2 × slope = 2 × {m:.3} = {a:.3} m/s²)\n\n\
                 The object starts at x₀ = {b:.3} m with a constant acceleration of {a:.3} m/s²."
            );
            if b.abs() < 1.0 {
                text.push_str(
                    "\nAn initial position close to zero is consistent with the reference origin.",
                );
            }
        }
        KinematicVariable::VelocityTime => {
            let _ = write!(
                text,
                "The velocity equation is: v(t) = v₀ + a·t\n\n\
                 • Initial velocity (v₀): {b:.3} m/s\n\
                 • Constant acceleration (a): {m:.3} m/s²\n\n\
                 The object accelerates uniformly at {m:.3} m/s², \
                 starting from an initial velocity of {b:.3} m/s."
            );
        }
        KinematicVariable::AccelerationTime => {
            let _ = write!(
                text,
                "In MRUA the acceleration is constant:\n\n\
                 • Constant acceleration (a): {b:.3} m/s²\n\
                 • Change in acceleration: {m:.6} m/s³ (≈ 0)\n\n\
                 A slope close to zero confirms the acceleration is constant."
            );
        }
    }
}
