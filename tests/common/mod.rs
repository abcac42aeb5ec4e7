#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use gridiron_features::{RawTeamGame, RawValue};

pub const TEAMS: &[&str] = &["ari", "bal", "chi", "den", "gnb", "kan"];

#[derive(Debug, Clone)]
pub struct Game {
    pub season: i32,
    pub week: u32,
    pub home: String,
    pub away: String,
    pub home_pts: u32,
    pub away_pts: u32,
}

/// Builds both scraped rows for each scheduled game, with running records and
/// box scores that agree across the two sides.
#[derive(Debug, Clone, Default)]
pub struct LeagueBuilder {
    games: Vec<Game>,
}

impl LeagueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(
        mut self,
        season: i32,
        week: u32,
        home: &str,
        away: &str,
        home_pts: u32,
        away_pts: u32,
    ) -> Self {
        self.games.push(Game {
            season,
            week,
            home: home.to_string(),
            away: away.to_string(),
            home_pts,
            away_pts,
        });
        self
    }

    /// Circle-method schedule: every team plays once per week.
    pub fn round_robin(mut self, teams: &[&str], season: i32, weeks: u32) -> Self {
        let n = teams.len();
        assert!(n >= 2 && n % 2 == 0);
        for week in 1..=weeks {
            let mut order = (0..n).collect::<Vec<_>>();
            order[1..].rotate_left((week as usize - 1) % (n - 1));
            for i in 0..n / 2 {
                let (a, b) = (order[i], order[n - 1 - i]);
                let (home, away) = if week % 2 == 0 { (a, b) } else { (b, a) };
                let home_pts = points(home as u32, week, season);
                let away_pts = points(away as u32 + 11, week, season);
                self = self.game(season, week, teams[home], teams[away], home_pts, away_pts);
            }
        }
        self
    }

    pub fn rows(&self) -> Vec<RawTeamGame> {
        let mut games = self.games.clone();
        games.sort_by_key(|g| (g.season, g.week));

        let mut records: HashMap<(String, i32), (u32, u32, u32)> = HashMap::new();
        let mut out = Vec::with_capacity(games.len() * 2);
        for game in &games {
            let home_off = offense(&game.home, game.week, game.home_pts);
            let away_off = offense(&game.away, game.week, game.away_pts);
            out.push(side_row(game, &game.home, &game.away, true, &home_off, &away_off, &mut records));
            out.push(side_row(game, &game.away, &game.home, false, &away_off, &home_off, &mut records));
        }
        out
    }
}

pub fn week_date(season: i32, week: u32) -> NaiveDate {
    let opener = NaiveDate::from_ymd_opt(season, 9, 9).unwrap();
    opener
        .checked_add_days(Days::new(7 * u64::from(week - 1)))
        .unwrap()
}

fn points(seed: u32, week: u32, season: i32) -> u32 {
    let mix = seed.wrapping_mul(2_654_435_761) ^ week.wrapping_mul(40_503) ^ season as u32;
    7 + mix % 31
}

#[derive(Debug, Clone)]
struct Offense {
    pts: u32,
    first_down: u32,
    turnovers: u32,
    pass_cmp: u32,
    pass_att: u32,
    pass_yds: u32,
    pass_td: u32,
    rush_att: u32,
    rush_yds: u32,
    rush_td: u32,
    third_success: u32,
    third_att: u32,
    fourth_success: u32,
    fourth_att: u32,
}

fn offense(team: &str, week: u32, pts: u32) -> Offense {
    let seed = team.bytes().map(u32::from).sum::<u32>() + week * 13;
    let pass_att = 25 + seed % 15;
    let fourth_att = seed % 3;
    Offense {
        pts,
        first_down: 12 + pts / 3 + seed % 5,
        turnovers: seed % 4,
        pass_cmp: pass_att * 3 / 5,
        pass_att,
        pass_yds: 140 + pts * 4 + seed % 37,
        pass_td: pts / 10,
        rush_att: 20 + seed % 11,
        rush_yds: 70 + seed % 53,
        rush_td: pts % 10 / 7,
        third_success: 3 + seed % 5,
        third_att: 12 + seed % 4,
        fourth_success: fourth_att.min(seed % 2),
        fourth_att,
    }
}

fn side_row(
    game: &Game,
    team: &str,
    opponent: &str,
    home: bool,
    own: &Offense,
    other: &Offense,
    records: &mut HashMap<(String, i32), (u32, u32, u32)>,
) -> RawTeamGame {
    let record = records.entry((team.to_string(), game.season)).or_default();
    let outcome = match own.pts.cmp(&other.pts) {
        std::cmp::Ordering::Greater => {
            record.0 += 1;
            "W"
        }
        std::cmp::Ordering::Less => {
            record.1 += 1;
            "L"
        }
        std::cmp::Ordering::Equal => {
            record.2 += 1;
            "T"
        }
    };
    let team_record = if record.2 > 0 {
        format!("{}-{}-{}", record.0, record.1, record.2)
    } else {
        format!("{}-{}", record.0, record.1)
    };

    let mut row = RawTeamGame {
        team: Some(team.to_string()),
        opponent: Some(opponent.to_string()),
        season_year: Some(RawValue::Number(f64::from(game.season))),
        week_num: Some(RawValue::Text(game.week.to_string())),
        game_date: Some(week_date(game.season, game.week).format("%Y-%m-%d").to_string()),
        game_location: Some(if home { "" } else { "@" }.to_string()),
        game_outcome: Some(outcome.to_string()),
        team_record: Some(team_record),
        ..RawTeamGame::default()
    };

    let own_yards = own.pass_yds + own.rush_yds;
    let other_yards = other.pass_yds + other.rush_yds;
    let stats = [
        ("pts_off", own.pts),
        ("pts_def", other.pts),
        ("first_down_off", own.first_down),
        ("first_down_def", other.first_down),
        ("yards_off", own_yards),
        ("yards_def", other_yards),
        ("to_off", own.turnovers),
        ("to_def", other.turnovers),
        ("pass_cmp", own.pass_cmp),
        ("pass_att", own.pass_att),
        ("pass_yds", own.pass_yds),
        ("pass_td", own.pass_td),
        ("rush_att", own.rush_att),
        ("rush_yds", own.rush_yds),
        ("rush_td", own.rush_td),
        ("third_down_success", own.third_success),
        ("third_down_att", own.third_att),
        ("fourth_down_success", own.fourth_success),
        ("fourth_down_att", own.fourth_att),
    ];
    for (name, value) in stats {
        row.stats
            .insert(name.to_string(), RawValue::Number(f64::from(value)));
    }
    row
}

/// Two seasons of six teams playing ten weeks each.
pub fn sample_league() -> Vec<RawTeamGame> {
    LeagueBuilder::new()
        .round_robin(TEAMS, 2000, 10)
        .round_robin(TEAMS, 2001, 10)
        .rows()
}

/// A and B each play four warm-up games against X and Y, then meet in week 5
/// (A wins 24-10 at home). C and D only meet twice.
pub fn scenario_league() -> Vec<RawTeamGame> {
    LeagueBuilder::new()
        .game(2001, 1, "A", "X", 20, 17)
        .game(2001, 1, "Y", "B", 13, 27)
        .game(2001, 1, "C", "D", 10, 3)
        .game(2001, 2, "Y", "A", 21, 24)
        .game(2001, 2, "X", "B", 14, 14)
        .game(2001, 2, "D", "C", 6, 9)
        .game(2001, 3, "X", "A", 10, 31)
        .game(2001, 3, "B", "Y", 17, 20)
        .game(2001, 4, "A", "Y", 28, 7)
        .game(2001, 4, "B", "X", 23, 16)
        .game(2001, 5, "A", "B", 24, 10)
        .game(2001, 5, "X", "Y", 12, 19)
        .rows()
}
