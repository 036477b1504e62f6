//! Interactive play loop.
//!
//! Two event sources are multiplexed with `tokio::select!`: a fixed
//! interval that drives Knowledge Health decay for the challenge in flight,
//! and stdin lines carrying learner commands and answers. Each source runs
//! to completion before the next is polled, so the session is only ever
//! touched by one handler at a time.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use quizionix_core::{GameSession, pacing};
use quizionix_types::{BranchId, ZoneId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::render;

/// A parsed line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// List zones.
    Zones,
    /// Enter a zone.
    Enter(ZoneId),
    /// Select a branch and generate a challenge.
    Play(ZoneId, BranchId),
    /// Answer the challenge in flight.
    Answer(String),
    /// Drop the challenge in flight.
    Skip,
    /// Move to the branch after the current one.
    Next,
    /// Debug zone unlock.
    Unlock,
    /// List badges.
    Badges,
    /// Show the mastery map.
    Progress,
    /// Show the status line.
    Status,
    /// Export the research log.
    Export(PathBuf),
    /// Write a save file.
    Save(PathBuf),
    /// Discard all progress.
    Restart,
    /// Show help.
    Help,
    /// Leave the game.
    Quit,
    /// Blank line.
    Empty,
    /// Malformed command; carries the message to show.
    Invalid(String),
}

/// Parse one line of input.
///
/// Command words take precedence. Any other line is an answer while a
/// challenge is in flight; `answer <text>` forces an answer.
pub fn parse_input(line: &str, challenge_active: bool) -> Input {
    let trimmed = line.trim();
    let mut words = trimmed.split_whitespace();
    let Some(command) = words.next() else {
        return Input::Empty;
    };
    let first = words.next();
    let second = words.next();

    match (command.to_lowercase().as_str(), first, second) {
        ("zones", None, _) => Input::Zones,
        ("enter", Some(zone), None) => Input::Enter(ZoneId::from(zone)),
        ("enter", ..) => Input::Invalid("usage: enter <zone>".to_owned()),
        ("play", Some(zone), Some(branch)) => {
            Input::Play(ZoneId::from(zone), BranchId::from(branch))
        }
        ("play", ..) => Input::Invalid("usage: play <zone> <branch>".to_owned()),
        ("answer", Some(_), _) => Input::Answer(
            trimmed
                .split_once(char::is_whitespace)
                .map_or_else(String::new, |(_, rest)| rest.trim().to_owned()),
        ),
        ("skip", None, _) => Input::Skip,
        ("next", None, _) => Input::Next,
        ("unlock", None, _) => Input::Unlock,
        ("badges", None, _) => Input::Badges,
        ("progress", None, _) => Input::Progress,
        ("status", None, _) => Input::Status,
        ("export", Some(path), None) => Input::Export(PathBuf::from(path)),
        ("export", ..) => Input::Invalid("usage: export <file>".to_owned()),
        ("save", Some(path), None) => Input::Save(PathBuf::from(path)),
        ("save", ..) => Input::Invalid("usage: save <file>".to_owned()),
        ("restart", None, _) => Input::Restart,
        ("help" | "?", None, _) => Input::Help,
        ("quit" | "exit", None, _) => Input::Quit,
        _ if challenge_active => Input::Answer(trimmed.to_owned()),
        _ => Input::Invalid(format!("unknown command: {trimmed} (try `help`)")),
    }
}

/// Output of one handled input.
#[derive(Debug, Default)]
pub struct Step {
    /// Text to print.
    pub output: String,
    /// The learner asked to leave.
    pub quit: bool,
}

impl Step {
    fn say(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// Terminal front end over a [`GameSession`].
#[derive(Debug)]
pub struct PlayLoop {
    session: GameSession,
    urgent_shown: bool,
}

impl PlayLoop {
    /// Wrap a session.
    pub const fn new(session: GameSession) -> Self {
        Self {
            session,
            urgent_shown: false,
        }
    }

    /// Run until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if stdin cannot be read.
    pub async fn run(mut self) -> Result<(), CliError> {
        let mut ticker = interval(pacing::tick_interval(&self.session.config().pacing));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("Welcome to {}!", self.session.config().world.name);
        println!("{}", render::HELP);
        prompt();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(alert) = self.on_tick(Instant::now()) {
                        println!("\n{alert}");
                        prompt();
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed");
                        break;
                    };
                    let input = parse_input(&line, self.session.active_challenge().is_some());
                    let step = self.handle(input, Instant::now()).await;
                    print!("{}", step.output);
                    if step.quit {
                        break;
                    }
                    prompt();
                }
            }
        }

        info!(
            points = self.session.state().total_points,
            badges = self.session.badges().len(),
            "play loop finished"
        );
        Ok(())
    }

    /// Apply one decay tick and return an alert the first time Knowledge
    /// Health drops into the urgent band during a challenge.
    pub fn on_tick(&mut self, now: Instant) -> Option<String> {
        let report = self.session.tick(now)?;
        if report.urgent && !self.urgent_shown {
            self.urgent_shown = true;
            return Some(format!(
                "Knowledge Health critical: {:.1}. Answer soon!",
                report.knowledge_health
            ));
        }
        if !report.urgent {
            self.urgent_shown = false;
        }
        None
    }

    /// Handle one input at `now`.
    pub async fn handle(&mut self, input: Input, now: Instant) -> Step {
        match input {
            Input::Zones => Step::say(render::zones(&self.session)),
            Input::Enter(zone_id) => match self.session.enter_zone(&zone_id) {
                Ok(zone) => Step::say(format!("Entered {}. {}\n", zone.name, zone.description)),
                Err(e) => Step::say(format!("{e}\n")),
            },
            Input::Play(zone_id, branch_id) => self.start_branch(&zone_id, &branch_id, now),
            Input::Answer(answer) => self.answer(&answer, now),
            Input::Skip => {
                if self.session.abandon_challenge() {
                    Step::say("Challenge skipped.\n")
                } else {
                    Step::say("No challenge in progress.\n")
                }
            }
            Input::Next => match self.session.next_branch() {
                Some(branch) => {
                    let (zone_id, branch_id) = (branch.zone_id.clone(), branch.id.clone());
                    self.start_branch(&zone_id, &branch_id, now)
                }
                None => Step::say("No further branch in this zone.\n"),
            },
            Input::Unlock => match self.session.unlock_one_zone_debug() {
                Some(zone_id) => Step::say(format!("Zone unlocked: {zone_id}\n")),
                None => Step::say("Every zone is already unlocked.\n"),
            },
            Input::Badges => Step::say(render::badges(self.session.badges())),
            Input::Progress => Step::say(render::progress(&self.session.progress_snapshot())),
            Input::Status => Step::say(format!("{}\n", render::status(&self.session.game_state()))),
            Input::Export(path) => Step::say(self.export(&path).await),
            Input::Save(path) => Step::say(self.save(&path).await),
            Input::Restart => match self.session.restart() {
                Ok(()) => {
                    self.urgent_shown = false;
                    Step::say("Progress discarded. Fresh start!\n")
                }
                Err(e) => Step::say(format!("{e}\n")),
            },
            Input::Help => Step::say(format!("{}\n", render::HELP)),
            Input::Quit => Step {
                output: "Goodbye.\n".to_owned(),
                quit: true,
            },
            Input::Empty => Step::default(),
            Input::Invalid(message) => Step::say(format!("{message}\n")),
        }
    }

    fn start_branch(&mut self, zone_id: &ZoneId, branch_id: &BranchId, now: Instant) -> Step {
        match self.session.select_branch(zone_id, branch_id) {
            Ok(branch) => {
                let mut output = format!("Branch: {} ({}%)\n", branch.name, branch.mastery);
                output.push_str(&self.next_challenge(now));
                Step::say(output)
            }
            Err(e) => Step::say(format!("{e}\n")),
        }
    }

    fn next_challenge(&mut self, now: Instant) -> String {
        let (Some(zone_id), Some(branch_id)) = (
            self.session.state().current_zone_id.clone(),
            self.session.state().current_branch_id.clone(),
        ) else {
            return "Pick a branch with `play <zone> <branch>`.\n".to_owned();
        };
        self.urgent_shown = false;
        match self.session.generate_challenge(&zone_id, &branch_id, now) {
            Ok(challenge) => render::challenge(
                &challenge,
                &self.session.choice_options(),
                self.session.boss_indicator().as_deref(),
            ),
            Err(e) => format!("{e}\n"),
        }
    }

    fn answer(&mut self, answer: &str, now: Instant) -> Step {
        let answer = render::resolve_choice(answer, &self.session.choice_options());
        match self.session.submit_answer(&answer, now) {
            Ok(result) => {
                let mut output = render::evaluation(&result);
                output.push_str(&format!("{}\n", render::status(&self.session.game_state())));
                let follow_up = if result.boss_completed {
                    self.branch_cleared()
                } else {
                    self.next_challenge(now)
                };
                output.push_str(&follow_up);
                Step::say(output)
            }
            Err(e) => Step::say(format!("{e}\n")),
        }
    }

    /// Session summary and the way forward once a branch boss falls. No
    /// further challenge is generated on the cleared branch.
    fn branch_cleared(&self) -> String {
        let mut out = String::new();
        if let Some(summary) = self.session.session_summary() {
            out.push_str(&format!(
                "Session: +{} points, mastery {:+}%, KH {:+.1}\n",
                summary.points_gained, summary.mastery_change, summary.knowledge_health_change
            ));
        }
        match self.session.next_branch() {
            Some(branch) => out.push_str(&format!(
                "Branch cleared! Type `next` to continue with {}.\n",
                branch.name
            )),
            None => out.push_str(
                "Branch cleared! That was the last branch here. Type `zones` to pick a zone.\n",
            ),
        }
        out
    }

    async fn export(&self, path: &Path) -> String {
        let json = match self.session.export_research_json() {
            Ok(json) => json,
            Err(e) => return format!("{}\n", CliError::from(e)),
        };
        match tokio::fs::write(path, json).await {
            Ok(()) => format!(
                "Research log ({} entries) written to {}\n",
                self.session.research_log().len(),
                path.display()
            ),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "research export failed");
                format!("{}\n", CliError::from(e))
            }
        }
    }

    async fn save(&self, path: &Path) -> String {
        let json = match self.session.capture_snapshot().to_json() {
            Ok(json) => json,
            Err(e) => return format!("{}\n", CliError::from(e)),
        };
        match tokio::fs::write(path, json).await {
            Ok(()) => format!("Saved to {}\n", path.display()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "save failed");
                format!("{}\n", CliError::from(e))
            }
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
