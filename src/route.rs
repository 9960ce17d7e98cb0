use std::fmt;
use std::str::FromStr;

/// Client-side routes of the onboarding app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Level2,
    Level3,
    Quests,
    Badges,
    Buddy,
    Feedback,
    TrialBalanceQuest,
    TrialBalanceLessons,
    LearnAccounting,
    AccountingQuiz,
    AccountingCaseStudy,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 12] = [
        Route::Dashboard,
        Route::Level2,
        Route::Level3,
        Route::Quests,
        Route::Badges,
        Route::Buddy,
        Route::Feedback,
        Route::TrialBalanceQuest,
        Route::TrialBalanceLessons,
        Route::LearnAccounting,
        Route::AccountingQuiz,
        Route::AccountingCaseStudy,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Level2 => "/level/2",
            Route::Level3 => "/level/3",
            Route::Quests => "/quests",
            Route::Badges => "/badges",
            Route::Buddy => "/buddy",
            Route::Feedback => "/feedback",
            Route::TrialBalanceQuest => "/quests/trial-balance",
            Route::TrialBalanceLessons => "/quests/trial-balance-lessons",
            Route::LearnAccounting => "/learn/accounting",
            Route::AccountingQuiz => "/learn/accounting/quiz",
            Route::AccountingCaseStudy => "/learn/accounting/case-study",
            Route::NotFound => "*",
        }
    }
}

/// Unknown paths resolve to [`Route::NotFound`].
impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::ALL
            .into_iter()
            .find(|route| route.path() == s)
            .unwrap_or(Route::NotFound))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
