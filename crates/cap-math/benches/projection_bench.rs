use cap_core::{Player, PlayerId, ProjectionOptions, Team};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

fn build_roster(n_players: usize) -> (Team, Vec<Player>) {
    let team = Team {
        abbr_name: "KC".into(),
        cap_room: Decimal::new(279_200_000, 0),
        cap_spent: Decimal::new(260_000_000, 0),
        cap_available: Decimal::new(19_200_000, 0),
        calendar_year: Some(2026),
    };
    let mut players = Vec::with_capacity(n_players);
    for i in 0..n_players {
        let length = (i % 7) as u32 + 1;
        players.push(Player {
            id: PlayerId(format!("P{i}")),
            name: format!("Player {i}"),
            position: "DL".into(),
            team: "KC".into(),
            is_free_agent: false,
            cap_hit: Decimal::new(1_000_000 + (i as i64) * 150_000, 0),
            contract_salary: Decimal::new(4_000_000 * length as i64, 0),
            contract_bonus: Decimal::new(1_000_000 * length as i64, 0),
            contract_length: length,
            contract_years_left: length - (i as u32 % length),
            cap_release_penalty: Decimal::new(500_000, 0),
            cap_release_net_savings: Decimal::new(750_000, 0),
            desired_salary: Decimal::ZERO,
            desired_bonus: Decimal::ZERO,
            desired_length: 0,
        });
    }
    (team, players)
}

fn bench_projection(c: &mut Criterion) {
    let (team, players) = build_roster(53);
    let moves: Vec<_> = players
        .iter()
        .step_by(5)
        .map(|p| cap_math::simulate_release(&team, p).action)
        .collect();
    let opts = ProjectionOptions::default();
    c.bench_function("project 53 players x 10y", |b| {
        b.iter(|| {
            let _ = black_box(cap_math::project_team_caps(
                &team, &players, &moves, 10, &opts,
            ));
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
