//! Element selectors for the two supported dashboards.
//!
//! These are tied to the DOM each host serves today; when a host changes its
//! markup, this is the only file that should need to follow.

/// Creators wizard (`creators.spotify.com`).
pub mod spotify {
    use crate::selector::css_string;
    use crate::Selector;

    pub const WIZARD_URL: &str = "https://creators.spotify.com/pod/dashboard/episode/wizard";
    pub const EPISODES_URL: &str = "https://podcasters.spotify.com/pod/dashboard/episodes";
    pub const VIEWPORT: (u32, u32) = (2560, 1440);

    pub const CHANGE_LANGUAGE: Selector = Selector::css(r#"button[aria-label="Change language"]"#);
    pub const LANGUAGE_ENGLISH: Selector = Selector::css(r#"[data-testid="language-option-en"]"#);
    pub const COOKIE_BANNER_CLOSED: &str = "OptanonAlertBoxClosed";

    pub const CONTINUE_WITH_SPOTIFY: Selector =
        Selector::xpath(r#"//span[contains(text(), "Continue with Spotify")]/parent::button"#);
    pub const LOGIN_USERNAME: Selector = Selector::css("#login-username");
    pub const LOGIN_PASSWORD: Selector = Selector::css("#login-password");
    pub const LOGIN_BUTTON: Selector = Selector::css(r#"button[id="login-button"]"#);
    pub const AUTH_ACCEPT: Selector = Selector::css(r#"button[data-testid="auth-accept"]"#);
    pub const SELECT_A_FILE: Selector =
        Selector::xpath(r#"//span[contains(text(),"Select a file")]"#);

    pub const FILE_INPUT: Selector = Selector::css("input[type=file]");
    pub const PREVIEW_READY: Selector =
        Selector::xpath(r#"//span[contains(text(),"Preview ready!")]"#);

    pub const TITLE_INPUT: Selector = Selector::css("#title-input");
    pub const DESCRIPTION_BOX: Selector = Selector::css(r#"div[role="textbox"]"#);
    pub const IMAGE_INPUT: Selector = Selector::css(r#"input[type="file"][accept*="image"]"#);
    pub const SAVE_IMAGE: Selector = Selector::xpath(r#"//span[text()="Save"]/parent::button"#);
    pub const IMAGE_UPLOADER: Selector = Selector::xpath(r#"//div[@aria-label="image uploader"]"#);
    pub const EXPLICIT_CHECKBOX: Selector =
        Selector::xpath(r#"//input[@name="podcastEpisodeIsExplicit"]/parent::*"#);
    pub const SPONSORED_CHECKBOX: Selector =
        Selector::xpath(r#"//input[@name="podcastEpisodeContainsSponsoredContent"]/parent::*"#);
    pub const NEXT: Selector = Selector::xpath(r#"//span[text()="Next"]/parent::button"#);

    pub const SCHEDULE_RADIO: Selector =
        Selector::css(r#"input[type="radio"][id="publish-date-schedule"]"#);
    pub const PUBLISH_NOW_RADIO: Selector =
        Selector::css(r#"input[type="radio"][id="publish-date-now"]"#);

    pub const HEADER_MENU: Selector = Selector::css("header > button > span");
    pub const SAVE_DRAFT: Selector = Selector::xpath(r#"//span[text()="Save draft"]/parent::button"#);
    pub const SCHEDULE: Selector = Selector::xpath(r#"//span[text()="Schedule"]/parent::button"#);
    pub const PUBLISH: Selector = Selector::xpath(r#"//span[text()="Publish"]/parent::button"#);

    /// The podcast entry in the dashboard's podcast switcher.
    pub fn podcast_link(title: &str) -> Selector {
        Selector::shadow("#__chrome", format!("a[aria-label={}]", css_string(title)))
    }
}

/// Legacy episode dashboard (`anchor.fm`).
pub mod anchor {
    use crate::Selector;

    pub const NEW_EPISODE_URL: &str = "https://anchor.fm/dashboard/episode/new";
    pub const EPISODES_URL: &str = "https://anchor.fm/dashboard/episodes";
    pub const VIEWPORT: (u32, u32) = (1600, 789);

    pub const EMAIL: Selector = Selector::css("#email");
    pub const PASSWORD: Selector = Selector::css("#password");
    pub const SUBMIT: Selector = Selector::css("button[type=submit]");
    pub const FILE_INPUT: Selector = Selector::css("input[type=file]");
    pub const SAVE_EPISODE: Selector =
        Selector::xpath(r#"//button[not(boolean(@disabled))]/*[text()="Save episode"]"#);
    pub const TITLE_INPUT: Selector = Selector::css("#title");
    pub const DESCRIPTION_BOX: Selector = Selector::css(r#"div[role="textbox"]"#);

    pub const SAVE_AS_DRAFT_LABEL: Selector = Selector::xpath(r#"//*[text()="Save as draft"]"#);
    pub const PUBLISH_NOW_LABEL: Selector = Selector::xpath(r#"//*[text()="Publish now"]"#);
    /// Styled-components class path of the primary action button.
    pub const PRIMARY_ACTION_BUTTON: Selector =
        Selector::css(".styles__button___2oNPe.styles__purple___2u-0h.css-39f635");
}

/// Date picker widget of the review step.
pub mod calendar {
    use crate::Selector;

    pub const DATE_INPUT: Selector = Selector::css("#date-input");
    pub const CAPTION: Selector = Selector::css(
        r#"div[class*="CalendarMonth"][data-visible="true"] div[class*="CalendarMonth_caption"] > strong"#,
    );
    pub const PREVIOUS_MONTH: Selector =
        Selector::css(r#"div[class*="DayPickerNavigation_leftButton__horizontalDefault"]"#);
    pub const NEXT_MONTH: Selector =
        Selector::css(r#"div[class*="DayPickerNavigation_rightButton__horizontalDefault"]"#);

    /// The cell of the visible month whose text is exactly `day`.
    pub fn day_cell(day: u32) -> Selector {
        Selector::xpath_owned(format!(
            r#"//div[contains(@class, "CalendarMonth") and @data-visible="true"]//td[normalize-space(text())="{day}"]"#
        ))
    }
}
