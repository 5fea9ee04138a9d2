use std::fmt;

/// Ordinal reported for any state that is not recognized.
///
/// Sorts below every known state, including [`ContainerState::Exited`].
pub const UNKNOWN_ORDINAL: f64 = 0.1;

/// Lifecycle state of a container as reported by the runtime.
///
/// States the runtime may report beyond the recognized set (e.g. `paused`,
/// `dead`) fall into [`ContainerState::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerState {
    Unknown,
    Created,
    Restarting,
    Exited,
    Running,
}

impl ContainerState {
    /// Maps a runtime state string to a [`ContainerState`].
    ///
    /// Matching is exact; anything else is [`ContainerState::Unknown`].
    pub fn parse(state: &str) -> Self {
        match state {
            "created" => Self::Created,
            "restarting" => Self::Restarting,
            "exited" => Self::Exited,
            "running" => Self::Running,
            _ => Self::Unknown,
        }
    }

    /// The ordinal in `(0, 1]` used to order and color the state.
    pub fn ordinal(self) -> f64 {
        match self {
            Self::Unknown => UNKNOWN_ORDINAL,
            Self::Created => 0.2,
            Self::Restarting => 0.4,
            Self::Exited => 0.6,
            Self::Running => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Created => "created",
            Self::Restarting => "restarting",
            Self::Exited => "exited",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the ordinal for a runtime state string.
///
/// # Examples
///
/// ```
/// # use docker_state_exporter::container::{state_ordinal, UNKNOWN_ORDINAL};
/// assert_eq!(state_ordinal("running"), 1.0);
/// assert_eq!(state_ordinal("paused"), UNKNOWN_ORDINAL);
/// ```
pub fn state_ordinal(state: &str) -> f64 {
    ContainerState::parse(state).ordinal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_states() {
        assert_eq!(state_ordinal("created"), 0.2);
        assert_eq!(state_ordinal("restarting"), 0.4);
        assert_eq!(state_ordinal("exited"), 0.6);
        assert_eq!(state_ordinal("running"), 1.0);
        assert_eq!(state_ordinal("unknown"), UNKNOWN_ORDINAL);
    }

    #[test]
    fn test_unrecognized_states_fall_back_to_unknown() {
        for state in ["", "paused", "dead", "removing", "Running", " running", "EXITED"] {
            assert_eq!(state_ordinal(state), UNKNOWN_ORDINAL, "state={state:?}");
            assert_eq!(ContainerState::parse(state), ContainerState::Unknown);
        }
    }

    #[test]
    fn test_unknown_sorts_below_every_known_state() {
        let known = [
            ContainerState::Created,
            ContainerState::Restarting,
            ContainerState::Exited,
            ContainerState::Running,
        ];
        for state in known {
            assert!(UNKNOWN_ORDINAL < state.ordinal(), "state={state}");
        }
        let ordinals: Vec<f64> = known.iter().map(|s| s.ordinal()).collect();
        assert!(ordinals.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ordinals_within_unit_interval() {
        for state in [
            ContainerState::Unknown,
            ContainerState::Created,
            ContainerState::Restarting,
            ContainerState::Exited,
            ContainerState::Running,
        ] {
            let ordinal = state.ordinal();
            assert!(ordinal > 0.0 && ordinal <= 1.0);
            assert_eq!(ContainerState::parse(state.as_str()), state);
        }
    }
}
