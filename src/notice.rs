//! Every line the device ever shows to the user.

use std::fmt;

/// The unsigned size of a measured angle in degrees.
///
/// Direction is dropped on construction; the remote application only ever
/// sees magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AngleMagnitude(f32);

impl AngleMagnitude {
    pub fn from_degrees(degrees: f32) -> Self {
        Self(degrees.abs())
    }

    pub fn degrees(self) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Reminder of the accepted commands, repeated after every trial.
    Instructions,
    HoldStill,
    GetIntoPosition,
    RotateNow,
    StartMoving,
    /// Seconds left in a countdown.
    Countdown(u32),
    Recalibrating,
    CalibrationComplete,
    Angle(AngleMagnitude),
    InvalidCommand,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Instructions => f.write_str(
                "Send f/e (wrist flex/ext), s/p (forearm sup/pro), x/y (elbow flex/ext), z (wrist deviation) or r (recalibrate).",
            ),
            Notice::HoldStill => f.write_str("Hold still..."),
            Notice::GetIntoPosition => f.write_str("Get into position..."),
            Notice::RotateNow => f.write_str("Rotate now..."),
            Notice::StartMoving => f.write_str("Start moving now!"),
            Notice::Countdown(seconds) => write!(f, "{}...", seconds),
            Notice::Recalibrating => f.write_str("Recalibrating..."),
            Notice::CalibrationComplete => f.write_str("Calibration complete."),
            Notice::Angle(angle) => write!(f, "ANGLE:{:.2}", angle.degrees()),
            Notice::InvalidCommand => f.write_str("Invalid command."),
        }
    }
}
