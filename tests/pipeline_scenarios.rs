mod common;

use gridiron_features::config::EARLIEST_SUPPORTED_SEASON;
use gridiron_features::spreads::{SpreadLine, VEGAS_PRED_MARGIN};
use gridiron_features::{DropReason, GameFrame, PipelineConfig, PipelineError, RawTeamGame, RawValue, run};

use common::{LeagueBuilder, scenario_league, week_date};

fn row_of(games: &GameFrame, game_id_prefix: &str) -> usize {
    games
        .keys()
        .iter()
        .position(|k| k.game_id.starts_with(game_id_prefix))
        .unwrap_or_else(|| panic!("no game starting with {game_id_prefix}"))
}

#[test]
fn scenario_game_has_both_perspectives() {
    let out = run(scenario_league(), &PipelineConfig::with_start_year(2001), None).unwrap();
    let games = &out.games;

    let ids = games.keys().iter().map(|k| k.game_id.as_str()).collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![
            "A-Y-2001-09-30",
            "B-X-2001-09-30",
            "A-B-2001-10-07",
            "X-Y-2001-10-07"
        ]
    );

    let row = row_of(games, "A-B-2001");
    let key = &games.keys()[row];
    assert_eq!(key.team, "A");
    assert_eq!(key.opponent, "B");
    assert_eq!(key.week_num, 5);
    assert_eq!(games.value("result_win", row), Some(1.0));
    assert_eq!(games.value("margin", row), Some(14.0));
    assert_eq!(games.value("margin_opp", row), Some(-14.0));
    assert_eq!(games.value("team_home_game", row), Some(1.0));

    assert_eq!(games.value("prev_margin", row), Some(21.0));
    assert_eq!(games.value("roll3_margin", row), Some(15.0));
    assert_eq!(games.value("roll16_num_wins", row), Some(4.0));
    assert_eq!(games.value("roll3_margin_opp", row), Some(1.333));
    assert_eq!(games.value("roll16_num_wins_opp", row), Some(2.0));
    assert_eq!(games.value("roll16_num_ties_opp", row), Some(1.0));
    assert_eq!(games.value("off_bye", row), Some(0.0));
}

#[test]
fn short_timelines_are_trimmed_and_accounted() {
    let rows = scenario_league();
    let total = rows.len();
    let out = run(rows, &PipelineConfig::with_start_year(2001), None).unwrap();

    assert!(
        out.games
            .keys()
            .iter()
            .all(|k| k.team != "C" && k.opponent != "C")
    );
    // A, B, X and Y lose their first three games each; C and D lose both.
    assert_eq!(out.report.dropped(DropReason::InsufficientHistory), 4 * 3 + 2 * 2);
    assert_eq!(out.report.games_out, 4);
    assert_eq!(total, 2 * out.report.games_out + out.report.drops.values().sum::<usize>());
}

#[test]
fn every_output_row_passes_the_gate() {
    let out = run(common::sample_league(), &PipelineConfig::with_start_year(2000), None).unwrap();
    assert!(!out.games.is_empty());
    for row in 0..out.games.len() {
        for gate in ["roll3_margin", "ewma19_margin", "roll16_num_wins"] {
            assert!(out.games.value(gate, row).is_some(), "{gate} missing on row {row}");
        }
    }
}

#[test]
fn zero_attempts_leave_the_rate_missing() {
    let mut rows = common::sample_league();
    for row in &mut rows {
        row.stats
            .insert("fourth_down_att".to_string(), RawValue::Number(0.0));
        row.stats
            .insert("fourth_down_success".to_string(), RawValue::Number(0.0));
    }
    let out = run(rows, &PipelineConfig::with_start_year(2000), None).unwrap();
    let fourth = out.games.require("fourth_down_pct").unwrap();
    let third = out.games.require("third_down_pct").unwrap();
    assert!(fourth.iter().all(Option::is_none));
    assert!(third.iter().all(Option::is_some));
    assert!(
        out.games
            .require("fourth_down_pct_opp")
            .unwrap()
            .iter()
            .all(Option::is_none)
    );
}

#[test]
fn bad_start_year_fails_before_any_row_is_read() {
    let err = run(Vec::new(), &PipelineConfig::with_start_year(1950), None).unwrap_err();
    let err = err.downcast::<PipelineError>().unwrap();
    assert!(matches!(
        err,
        PipelineError::Configuration {
            start_year: 1950,
            earliest: EARLIEST_SUPPORTED_SEASON
        }
    ));
}

#[test]
fn no_rows_after_filter_is_an_error() {
    let err = run(scenario_league(), &PipelineConfig::with_start_year(2030), None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::EmptyInput { start_year: 2030 })
    ));
}

#[test]
fn earlier_seasons_are_filtered_out() {
    let rows = LeagueBuilder::new()
        .round_robin(common::TEAMS, 1999, 6)
        .round_robin(common::TEAMS, 2001, 6)
        .rows();
    let out = run(rows, &PipelineConfig::with_start_year(2000), None).unwrap();
    assert_eq!(out.report.load.before_start_year, 6 * 6);
    assert!(out.games.keys().iter().all(|k| k.season_year == 2001));
}

#[test]
fn malformed_and_incomplete_rows_are_counted() {
    let mut rows = scenario_league();
    rows.push(RawTeamGame {
        team: Some("nan".to_string()),
        opponent: Some("A".to_string()),
        season_year: Some(RawValue::Number(2001.0)),
        game_date: Some("2001-09-09".to_string()),
        ..RawTeamGame::default()
    });
    // X's week-5 row loses its outcome; Y's row then has nothing left to join.
    let x_week5 = rows
        .iter()
        .position(|r| {
            r.team.as_deref() == Some("X")
                && r.game_date.as_deref() == Some("2001-10-07")
        })
        .unwrap();
    rows[x_week5].game_outcome = Some(String::new());

    let out = run(rows, &PipelineConfig::with_start_year(2001), None).unwrap();
    assert_eq!(out.report.dropped(DropReason::MalformedRow), 1);
    assert_eq!(out.report.dropped(DropReason::MissingOutcome), 1);
    assert_eq!(out.report.dropped(DropReason::JoinMismatch), 1);
    assert!(out.games.keys().iter().all(|k| !k.game_id.starts_with("X-Y-2001-10-07")));
}

#[test]
fn spreads_attach_from_each_teams_perspective() {
    let lines = vec![SpreadLine {
        schedule_date: week_date(2001, 5),
        team_home: "A".to_string(),
        team_away: "B".to_string(),
        team_favorite_id: "B".to_string(),
        spread_favorite: -2.5,
    }];
    let out = run(
        scenario_league(),
        &PipelineConfig::with_start_year(2001),
        Some(&lines),
    )
    .unwrap();
    let row = row_of(&out.games, "A-B-2001");
    assert_eq!(out.games.value(VEGAS_PRED_MARGIN, row), Some(-2.5));
    let others = (0..out.games.len()).filter(|&r| r != row);
    for other in others {
        assert_eq!(out.games.value(VEGAS_PRED_MARGIN, other), None);
    }
    assert_eq!(out.report.spread_lines, 1);
}

#[test]
fn blank_turnover_cells_count_as_zero() {
    let mut rows = scenario_league();
    for date in ["2001-09-16", "2001-09-23"] {
        let idx = rows
            .iter()
            .position(|r| r.team.as_deref() == Some("A") && r.game_date.as_deref() == Some(date))
            .unwrap();
        rows[idx]
            .stats
            .insert("to_off".to_string(), RawValue::from(""));
    }

    let out = run(rows, &PipelineConfig::with_start_year(2001), None).unwrap();
    assert_eq!(out.report.clean.zero_filled, 2);
    let row = row_of(&out.games, "A-B-2001");
    // Weeks 2-4 turnovers: blank, blank, 1.
    assert_eq!(out.games.value("roll3_to_off", row), Some(0.333));
    assert_eq!(out.games.value("roll3_to2_off", row), Some(0.333));
    assert!(out.games.value("ewma19_to_off", row).is_some());
    for name in out.games.column_names() {
        if name.starts_with("roll") || name.starts_with("ewma19_to") {
            assert!(out.games.value(name, row).is_some(), "{name} missing");
        }
    }
}
