use clap::ValueEnum;

use crate::models::{Match, Snapshot};

/// Which hardcoded sample dataset to serve when no live data is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MockFixtureSet {
    /// Five matches across the big European leagues
    #[default]
    Full,
    /// Premier League, La Liga and Bundesliga only
    Compact,
}

impl MockFixtureSet {
    pub fn matches(self) -> Vec<Match> {
        let all = sample_matches();
        match self {
            MockFixtureSet::Full => all,
            MockFixtureSet::Compact => all.into_iter().take(3).collect(),
        }
    }

    /// Sample dataset stamped with the current time.
    pub fn snapshot(self) -> Snapshot {
        Snapshot::now(self.matches())
    }
}

fn sample(
    id: i64,
    home: &str,
    away: &str,
    score: (u32, u32),
    elapsed: u32,
    league: &str,
    country: &str,
) -> Match {
    Match {
        id,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score: Some(score.0),
        away_score: Some(score.1),
        elapsed: Some(elapsed),
        league: league.to_string(),
        country: country.to_string(),
    }
}

fn sample_matches() -> Vec<Match> {
    vec![
        sample(1, "Manchester United", "Liverpool", (2, 1), 75, "Premier League", "England"),
        sample(2, "Barcelona", "Real Madrid", (0, 0), 32, "La Liga", "Spain"),
        sample(3, "Bayern Munich", "Borussia Dortmund", (3, 1), 65, "Bundesliga", "Germany"),
        sample(4, "Paris Saint-Germain", "Marseille", (1, 0), 42, "Ligue 1", "France"),
        sample(5, "AC Milan", "Inter Milan", (1, 2), 84, "Serie A", "Italy"),
    ]
}
