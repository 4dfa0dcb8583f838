use serde::Serialize;

/// What the front-end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// On/off for the three output regions. Derived, never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Visibility {
    pub loading: bool,
    pub chart: bool,
    pub error: bool,
}

impl ViewState {
    pub fn visibility(self) -> Visibility {
        Visibility {
            loading: self == ViewState::Loading,
            chart: self == ViewState::Success,
            error: self == ViewState::Error,
        }
    }

    /// Only a search can leave a state, and a search always goes through
    /// `Loading` first.
    pub fn can_transition_to(self, next: ViewState) -> bool {
        matches!(
            (self, next),
            (_, ViewState::Loading) | (ViewState::Loading, ViewState::Success | ViewState::Error)
        )
    }
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Success => "success",
            ViewState::Error => "error",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ViewState; 4] =
        [ViewState::Idle, ViewState::Loading, ViewState::Success, ViewState::Error];

    #[test]
    fn at_most_one_region_visible() {
        for state in ALL {
            let v = state.visibility();
            let on = [v.loading, v.chart, v.error].iter().filter(|b| **b).count();
            let expected = if state == ViewState::Idle { 0 } else { 1 };
            assert_eq!(on, expected, "{state}");
        }
    }

    #[test]
    fn visibility_per_state() {
        assert_eq!(
            ViewState::Loading.visibility(),
            Visibility { loading: true, chart: false, error: false }
        );
        assert_eq!(
            ViewState::Success.visibility(),
            Visibility { loading: false, chart: true, error: false }
        );
        assert_eq!(
            ViewState::Error.visibility(),
            Visibility { loading: false, chart: false, error: true }
        );
        assert_eq!(ViewState::Idle.visibility(), Visibility::default());
    }

    #[test]
    fn allowed_transitions() {
        use ViewState::*;

        assert!(Idle.can_transition_to(Loading));
        assert!(Success.can_transition_to(Loading));
        assert!(Error.can_transition_to(Loading));
        assert!(Loading.can_transition_to(Success));
        assert!(Loading.can_transition_to(Error));

        assert!(!Idle.can_transition_to(Success));
        assert!(!Idle.can_transition_to(Error));
        assert!(!Success.can_transition_to(Error));
        assert!(!Error.can_transition_to(Success));
        for s in ALL {
            assert!(!s.can_transition_to(Idle));
        }
    }
}
