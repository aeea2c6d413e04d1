//! Console tabulation of league tables and projections.

use std::collections::BTreeSet;

use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::mc::Projection;
use crate::ranking::Standings;
use crate::roster::Roster;

pub fn tabulate_standings(roster: &Roster, standings: &Standings) -> Table {
    let mut cols = vec![
        Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right)),
        Col::new(Styles::default().with(MinWidth(20)).with(Left)),
    ];
    cols.extend((0..8).map(|_| Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right))));
    let mut table = Table::default()
        .with_cols(cols)
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Pos".into(),
                "Team".into(),
                "P".into(),
                "W".into(),
                "D".into(),
                "L".into(),
                "GF".into(),
                "GA".into(),
                "GD".into(),
                "Pts".into(),
            ],
        ));
    for entry in standings.entries() {
        let overall = &entry.stats.overall;
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", entry.position).into(),
                roster[entry.stats.team].to_string().into(),
                format!("{}", overall.played).into(),
                format!("{}", overall.won).into(),
                format!("{}", overall.drawn).into(),
                format!("{}", overall.lost).into(),
                format!("{}", overall.goals_for).into(),
                format!("{}", overall.goals_against).into(),
                format!("{:+}", overall.goal_difference()).into(),
                format!("{}", overall.points).into(),
            ],
        ));
    }
    table
}

/// Teams in ascending order of expected finishing position.
fn by_expected_position(projection: &Projection) -> Vec<usize> {
    let distribution = projection.distribution();
    let mut teams: Vec<_> = (0..distribution.teams()).collect();
    teams.sort_by(|&a, &b| {
        distribution
            .expected_position(a)
            .total_cmp(&distribution.expected_position(b))
            .then(a.cmp(&b))
    });
    teams
}

/// Summary of each team's projected season.
pub fn tabulate_summary(projection: &Projection) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "xPos".into(),
                "xPts".into(),
                "xGD".into(),
                "First".into(),
                "Last".into(),
            ],
        ));
    let distribution = projection.distribution();
    for team in by_expected_position(projection) {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                projection.roster()[team].to_string().into(),
                format!("{:.2}", distribution.expected_position(team)).into(),
                format!("{:.2}", distribution.expected_points(team)).into(),
                format!("{:+.2}", distribution.expected_goal_difference(team)).into(),
                format!("{:.2}%", projection.first_place_probability(team) * 100.0).into(),
                format!("{:.2}%", projection.last_place_probability(team) * 100.0).into(),
            ],
        ));
    }
    table
}

/// Probability of each team finishing in each position.
pub fn tabulate_positions(projection: &Projection) -> Table {
    let distribution = projection.distribution();
    let positions = distribution.teams();
    let mut cols = vec![Col::new(Styles::default().with(MinWidth(20)).with(Left))];
    cols.extend((0..positions).map(|_| Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right))));
    let mut header: Vec<Cell> = vec!["Team".into()];
    header.extend((1..=positions).map(|position| format!("{position}").into()));
    let mut table = Table::default()
        .with_cols(cols)
        .with_row(Row::new(Styles::default().with(Header(true)), header));
    for team in by_expected_position(projection) {
        let mut cells: Vec<Cell> = vec![projection.roster()[team].to_string().into()];
        cells.extend(
            (1..=positions)
                .map(|position| format!("{:.1}", distribution.position_probability(team, position) * 100.0).into()),
        );
        table.push_row(Row::new(Styles::default(), cells));
    }
    table
}

/// Points distributions at the boundary positions, one column per position.
pub fn tabulate_boundaries(projection: &Projection) -> Table {
    let boundaries = projection.boundary_points();
    let trials = projection.distribution().trials() as f64;
    let points: BTreeSet<u32> = boundaries
        .iter()
        .flat_map(|(_, frequencies)| frequencies.keys().copied())
        .collect();

    let mut cols = vec![Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right))];
    cols.extend(boundaries.iter().map(|_| Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right))));
    let mut header: Vec<Cell> = vec!["Points".into()];
    header.extend(
        boundaries
            .iter()
            .map(|(position, _)| format!("Pos {position}").into()),
    );
    let mut table = Table::default()
        .with_cols(cols)
        .with_row(Row::new(Styles::default().with(Header(true)), header));
    for value in points {
        let mut cells: Vec<Cell> = vec![format!("{value}").into()];
        cells.extend(boundaries.iter().map(|(_, frequencies)| {
            let count = frequencies.get(&value).copied().unwrap_or_default();
            format!("{:.2}%", count as f64 / trials * 100.0).into()
        }));
        table.push_row(Row::new(Styles::default(), cells));
    }
    table
}
