use std::fmt;

/// Terminal action of the publish wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishMode {
    Draft,
    Schedule,
    PublishNow,
}

impl PublishMode {
    /// Draft wins over scheduling, scheduling wins over publishing now.
    pub fn resolve(save_as_draft: bool, set_publish_date: bool) -> Self {
        if save_as_draft {
            PublishMode::Draft
        } else if set_publish_date {
            PublishMode::Schedule
        } else {
            PublishMode::PublishNow
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishMode::Draft => write!(f, "draft"),
            PublishMode::Schedule => write!(f, "scheduled"),
            PublishMode::PublishNow => write!(f, "published"),
        }
    }
}
