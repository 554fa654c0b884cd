use crate::errors::ErrorClass;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
    Session,
    Load,
    Destroy,
    ListActions,
    Wait,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Report the failure and go on with the next step.
    Continue,
    /// Stop the run and surface the failure from `main`.
    Abort,
}

pub fn disposition(step: Step, class: ErrorClass) -> Disposition {
    match (step, class) {
        // Load verifies the token again, so a bad session is reported there.
        (Step::Session, _) => Disposition::Continue,
        (Step::Load, _) => Disposition::Abort,
        (Step::Destroy, _) => Disposition::Continue,
        // A droplet that is already gone has no action history left to show.
        (Step::ListActions, ErrorClass::NotFound) => Disposition::Continue,
        (Step::ListActions, _) => Disposition::Abort,
        (Step::Wait, _) => Disposition::Continue,
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_session_destroy_and_wait_always_continue() {
        for class in ErrorClass::iter() {
            assert_eq!(disposition(Step::Session, class), Disposition::Continue);
            assert_eq!(disposition(Step::Destroy, class), Disposition::Continue);
            assert_eq!(disposition(Step::Wait, class), Disposition::Continue);
        }
    }

    #[test]
    fn test_load_always_aborts() {
        for class in ErrorClass::iter() {
            assert_eq!(disposition(Step::Load, class), Disposition::Abort);
        }
    }

    #[test]
    fn test_list_actions_continues_only_when_droplet_is_gone() {
        for class in ErrorClass::iter() {
            let expected = if class == ErrorClass::NotFound {
                Disposition::Continue
            } else {
                Disposition::Abort
            };
            assert_eq!(disposition(Step::ListActions, class), expected);
        }
    }

    #[test]
    fn test_step_names() {
        assert_eq!(Step::ListActions.to_string(), "list-actions");
        assert_eq!(Step::Session.to_string(), "session");
    }
}
