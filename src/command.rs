//! Single-character commands accepted on either serial link.

/// One of the three shared angle algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Change of rotation about the long axis between two held stances.
    Roll,
    /// Tilt of the final held stance.
    Pitch,
    /// Angular rate integrated over a fixed window.
    Yaw,
}

/// A joint movement as selected by the remote application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    WristFlexion,
    WristExtension,
    ForearmSupination,
    ForearmPronation,
    ElbowFlexion,
    ElbowExtension,
    /// Radial and ulnar deviation share one selector.
    WristDeviation,
}

impl Movement {
    pub const ALL: [Movement; 7] = [
        Movement::WristFlexion,
        Movement::WristExtension,
        Movement::ForearmSupination,
        Movement::ForearmPronation,
        Movement::ElbowFlexion,
        Movement::ElbowExtension,
        Movement::WristDeviation,
    ];

    pub fn from_selector(selector: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|movement| movement.selector() == selector)
    }

    pub fn selector(self) -> u8 {
        match self {
            Movement::WristFlexion      => b'f',
            Movement::WristExtension    => b'e',
            Movement::ForearmSupination => b's',
            Movement::ForearmPronation  => b'p',
            Movement::ElbowFlexion      => b'x',
            Movement::ElbowExtension    => b'y',
            Movement::WristDeviation    => b'z',
        }
    }

    pub fn protocol(self) -> Protocol {
        match self {
            Movement::ForearmSupination | Movement::ForearmPronation => Protocol::Roll,
            Movement::WristDeviation => Protocol::Yaw,
            Movement::WristFlexion
            | Movement::WristExtension
            | Movement::ElbowFlexion
            | Movement::ElbowExtension => Protocol::Pitch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Movement::WristFlexion      => "Wrist Flexion",
            Movement::WristExtension    => "Wrist Extension",
            Movement::ForearmSupination => "Forearm Supination",
            Movement::ForearmPronation  => "Forearm Pronation",
            Movement::ElbowFlexion      => "Elbow Flexion",
            Movement::ElbowExtension    => "Elbow Extension",
            Movement::WristDeviation    => "Wrist Deviation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Line endings and nul padding, dropped without a trace.
    Ignore,
    Recalibrate,
    Measure(Movement),
    Invalid(u8),
}

impl Command {
    /// Case-insensitive.
    pub fn parse(byte: u8) -> Self {
        match byte.to_ascii_lowercase() {
            b'\n' | b'\r' | 0 => Command::Ignore,
            b'r' => Command::Recalibrate,
            selector => match Movement::from_selector(selector) {
                Some(movement) => Command::Measure(movement),
                None => Command::Invalid(byte),
            },
        }
    }
}
