use std::fmt;

use crate::PublishMode;

/// Milestones of one publishing run, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    BrowserLaunched,
    OnWizardPage,
    LanguageSet,
    CookieBannerHandled,
    LoggedIn,
    AuthResolved,
    PodcastSelected,
    FileUploaded,
    DetailsFilled,
    ReviewStep,
    ReviewDetailsFilled,
    Finalized(PublishMode),
    DashboardConfirmed,
    Closed,
}

impl Stage {
    /// Stages where a failure must be followed by diagnostic capture.
    pub fn has_open_page(&self) -> bool {
        !matches!(self, Stage::Start | Stage::Closed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "start"),
            Stage::BrowserLaunched => write!(f, "browser launched"),
            Stage::OnWizardPage => write!(f, "on wizard page"),
            Stage::LanguageSet => write!(f, "language set"),
            Stage::CookieBannerHandled => write!(f, "cookie banner handled"),
            Stage::LoggedIn => write!(f, "logged in"),
            Stage::AuthResolved => write!(f, "auth resolved"),
            Stage::PodcastSelected => write!(f, "podcast selected"),
            Stage::FileUploaded => write!(f, "file uploaded"),
            Stage::DetailsFilled => write!(f, "details filled"),
            Stage::ReviewStep => write!(f, "review step"),
            Stage::ReviewDetailsFilled => write!(f, "review details filled"),
            Stage::Finalized(mode) => write!(f, "finalized ({mode})"),
            Stage::DashboardConfirmed => write!(f, "dashboard confirmed"),
            Stage::Closed => write!(f, "closed"),
        }
    }
}
