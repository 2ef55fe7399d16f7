//! Tiebreak Walkthrough Example
//!
//! Plays a first set to 6-6, then a tiebreak, printing the board after
//! every point of the tiebreak.

use padel_score::{Match, MatchConfig, ScoringAction, Team, TeamId, TeamSlot};

fn point(m: &Match, team: &TeamId) -> Match {
    match m.apply(ScoringAction::Point(team.clone())) {
        Ok(transition) => {
            for event in &transition.events {
                println!("  event: {}", event);
            }
            transition.next
        }
        Err(e) => {
            println!("  ignored: {}", e);
            m.clone()
        }
    }
}

fn board(m: &Match) {
    println!(
        "  {} {} ({}) - {} {} ({})",
        m.team1.name,
        m.score_display(TeamSlot::One),
        m.score.games(TeamSlot::One),
        m.team2.name,
        m.score_display(TeamSlot::Two),
        m.score.games(TeamSlot::Two),
    );
}

fn main() {
    println!("=== Padel Tiebreak Example ===\n");

    let (team1, team2) = Team::default_pair();
    let (a, b) = (team1.id.clone(), team2.id.clone());
    let mut m = match Match::new(team1, team2, MatchConfig::default()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Could not start match: {}", e);
            return;
        }
    };

    // Alternate love games up to 6-6
    println!("Playing the set to 6-6...");
    for _ in 0..6 {
        for team in [&a, &b] {
            for _ in 0..4 {
                m = m
                    .apply(ScoringAction::Point(team.clone()))
                    .map(|t| t.next)
                    .unwrap_or(m);
            }
        }
    }
    println!("Tiebreak: {}\n", m.game_state.tiebreak);

    // 7-5 tiebreak for team 1
    let rallies = [&a, &b, &b, &a, &a, &b, &a, &b, &b, &a, &a, &a];
    for team in rallies {
        println!("Point for {}", team);
        m = point(&m, team);
        board(&m);
    }

    println!(
        "\nSets: {} - {}, now playing set {}",
        m.score.sets(TeamSlot::One),
        m.score.sets(TeamSlot::Two),
        m.game_state.current_set
    );
}
