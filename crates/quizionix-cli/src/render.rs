//! Plain-text rendering of session views for the terminal.
//!
//! Every function returns a `String` so the play loop decides where output
//! goes and the formatting stays testable.

use std::fmt::Write as _;

use quizionix_core::{GameSession, answers_match};
use quizionix_types::{
    Badge, Challenge, EvaluationResult, GameStateView, ProgressSnapshot, QuestionType,
    SmokeTestReport,
};

/// Help text for the interactive loop.
pub const HELP: &str = "\
Commands:
  zones                   list zones and branches
  enter <zone>            enter an unlocked zone
  play <zone> <branch>    select a branch and start answering
  <answer> | answer <a>   answer the current challenge (option text, number or #number)
  skip                    drop the current challenge
  next                    move to the branch after the current one
  unlock                  debug: unlock the next locked zone
  badges                  list earned badges
  progress                show the mastery map
  status                  show Knowledge Health, points and tier
  export <file>           write the research log as JSON
  save <file>             write a save file
  restart                 discard all progress
  help                    show this help
  quit                    leave the game";

/// Zones with their branches and lock state.
pub fn zones(session: &GameSession) -> String {
    let mut out = String::new();
    for zone in session.zones() {
        let lock = if zone.unlocked { "open" } else { "locked" };
        let _ = writeln!(out, "{} ({}) [{lock}]", zone.name, zone.id);
        if !zone.description.is_empty() {
            let _ = writeln!(out, "    {}", zone.description);
        }
        for branch in session.branches_for_zone(&zone.id) {
            let done = if branch.completed { " *" } else { "" };
            let _ = writeln!(
                out,
                "  - {} ({}) {}%{done}",
                branch.name, branch.id, branch.mastery
            );
        }
    }
    out
}

/// The challenge prompt with numbered options.
pub fn challenge(challenge: &Challenge, options: &[String], boss: Option<&str>) -> String {
    let mut out = format!(
        "[{} / {}] {} | expected {:.0}s\n",
        challenge.zone_name, challenge.branch_name, challenge.difficulty, challenge.expected_seconds
    );
    if let Some(indicator) = boss {
        let _ = writeln!(out, "{indicator}");
    }
    let _ = writeln!(out, "Q: {}", challenge.prompt);
    match challenge.question_type {
        QuestionType::MultipleChoice => {
            for (number, option) in (1_u32..).zip(options) {
                let _ = writeln!(out, "  {number}) {option}");
            }
        }
        QuestionType::Text => out.push_str("  (type your answer)\n"),
    }
    out
}

/// Map learner input onto the option text.
///
/// Input that matches an option literally wins, so numeric answer pools
/// grade what was typed. Otherwise a valid option number (`2` or `#2`)
/// selects that option. Anything else is returned unchanged.
pub fn resolve_choice(input: &str, options: &[String]) -> String {
    if let Some(option) = options.iter().find(|option| answers_match(input, option)) {
        return option.clone();
    }
    let trimmed = input.trim();
    trimmed
        .strip_prefix('#')
        .unwrap_or(trimmed)
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| options.get(index))
        .map_or_else(|| input.to_owned(), Clone::clone)
}

/// Outcome of an answer.
pub fn evaluation(result: &EvaluationResult) -> String {
    let mut out = format!("{}\n", result.message);
    if result.success {
        let _ = writeln!(
            out,
            "  +{} points (x{:.2}, {})",
            result.points_awarded,
            result.multiplier,
            result.pace.label()
        );
    }
    let _ = writeln!(out, "  {}", result.branch_progress_text);
    let _ = writeln!(out, "  {}", result.boss_progress_text);
    if let Some(hint) = &result.remediation_hint {
        let _ = writeln!(out, "  {hint}");
    }
    if result.boss_ready {
        out.push_str("  The branch boss has appeared!\n");
    }
    for badge in &result.new_badges {
        let _ = writeln!(out, "  Badge earned: {}", badge.title);
    }
    for zone in &result.unlocked_zones {
        let _ = writeln!(out, "  Zone unlocked: {zone}");
    }
    out
}

/// One-line status bar.
pub fn status(view: &GameStateView) -> String {
    let location = match (&view.current_zone, &view.current_branch) {
        (Some(zone), Some(branch)) => format!("{zone} / {branch}"),
        (Some(zone), None) => zone.clone(),
        _ => "no zone".to_owned(),
    };
    format!(
        "{location} | KH {:.1} ({:?}) | {} pts | {} | streak {}",
        view.knowledge_health,
        view.knowledge_health_band,
        view.total_points,
        view.difficulty_level,
        view.streak
    )
}

/// Earned badges, oldest first.
pub fn badges(badges: &[Badge]) -> String {
    if badges.is_empty() {
        return "No badges yet.\n".to_owned();
    }
    badges.iter().fold(String::new(), |mut out, badge| {
        let _ = writeln!(out, "{} -- {}", badge.title, badge.description);
        out
    })
}

/// The mastery map.
pub fn progress(snapshot: &ProgressSnapshot) -> String {
    let mut out = format!(
        "Overall mastery {}% | KH {:.1} | {} pts | {}\n",
        snapshot.overall_mastery,
        snapshot.knowledge_health,
        snapshot.total_points,
        snapshot.difficulty_level
    );
    for zone in &snapshot.mastery_map {
        if !zone.unlocked {
            let _ = writeln!(out, "{}: locked", zone.zone_name);
            continue;
        }
        let _ = writeln!(
            out,
            "{}: mastery {}%, bosses {}%{}",
            zone.zone_name,
            zone.mastery,
            zone.boss_mastery,
            if zone.boss_completed { " (cleared)" } else { "" }
        );
        for branch in &zone.branches {
            let _ = writeln!(
                out,
                "  {} {}% {:?} boss {:?} {}/{}",
                branch.name,
                branch.mastery,
                branch.status,
                branch.boss_status,
                branch.boss_hp,
                branch.boss_max_hp
            );
        }
    }
    out
}

/// Smoke test outcome.
pub fn smoke_test(report: &SmokeTestReport) -> String {
    let mut out = format!(
        "Content smoke test: {}\n",
        if report.pass { "PASS" } else { "FAIL" }
    );
    let _ = writeln!(
        out,
        "  authored zones: {} ({} items)",
        report.diagnostics.authored_zones.len(),
        report.diagnostics.total_items
    );
    for (zone, count) in &report.diagnostics.items_per_zone {
        let _ = writeln!(out, "    {zone}: {count}");
    }
    let sample = &report.challenge_sample;
    let _ = writeln!(
        out,
        "  sample: {} {} ({}){}",
        sample.difficulty,
        sample.question_type.label(),
        sample.id,
        if sample.fallback { " [fallback]" } else { "" }
    );
    out
}
