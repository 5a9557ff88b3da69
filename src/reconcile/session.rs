use anyhow::Result;
use tracing::{debug, info};

use crate::model::{Decision, MatchCandidate};
use crate::prompt::Prompt;

pub(crate) const NONE_OPTION: &str = "None";
pub(crate) const CANCEL_OPTION: &str = "Cancel";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SessionState {
    Active,
    /// Terminal: every remaining entry is rejected without asking.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Asset(usize),
    NoneOfThese,
    CancelRemaining,
}

#[derive(Debug, Default)]
pub(crate) struct ResolutionOutcome {
    pub fixed: Vec<MatchCandidate>,
    pub bad: Vec<MatchCandidate>,
    pub cancelled: bool,
}

/// Walks the ambiguous entries once, asking the user to adjudicate each.
pub(crate) struct ResolutionSession<'a, P: Prompt> {
    prompt: &'a mut P,
    state: SessionState,
}

impl<'a, P: Prompt> ResolutionSession<'a, P> {
    pub(crate) fn new(prompt: &'a mut P) -> Self {
        Self {
            prompt,
            state: SessionState::Active,
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn run(mut self, ambiguous: Vec<MatchCandidate>) -> Result<ResolutionOutcome> {
        let mut outcome = ResolutionOutcome::default();

        for candidate in ambiguous {
            match self.decide(&candidate)? {
                Decision::Fixed(asset) => {
                    info!(name = %candidate.entry.name, asset = %asset.name, "fixed");
                    let mut fixed = candidate;
                    fixed.screenshot = Some(asset);
                    outcome.fixed.push(fixed);
                }
                Decision::Bad => outcome.bad.push(candidate),
            }
        }

        outcome.cancelled = self.state() == SessionState::Cancelled;
        Ok(outcome)
    }

    fn decide(&mut self, candidate: &MatchCandidate) -> Result<Decision> {
        if self.state == SessionState::Cancelled {
            debug!(name = %candidate.entry.name, "skipped after cancel");
            return Ok(Decision::Bad);
        }

        let decision = match self.ask(candidate)? {
            Selection::Asset(index) => Decision::Fixed(candidate.shortlist[index].clone()),
            Selection::NoneOfThese => Decision::Bad,
            Selection::CancelRemaining => {
                self.state = SessionState::Cancelled;
                Decision::Bad
            }
        };
        Ok(decision)
    }

    fn ask(&mut self, candidate: &MatchCandidate) -> Result<Selection> {
        let message = format!("{} - ({}%)", candidate.entry.name, candidate.score());

        let mut options = candidate
            .shortlist
            .iter()
            .map(|asset| asset.name.clone())
            .collect::<Vec<_>>();
        let shortlist_len = options.len();
        options.push(NONE_OPTION.to_string());
        options.push(CANCEL_OPTION.to_string());

        let index = self.prompt.choose_one(&message, &options)?;
        let selection = if index < shortlist_len {
            Selection::Asset(index)
        } else if index == shortlist_len {
            Selection::NoneOfThese
        } else {
            Selection::CancelRemaining
        };
        Ok(selection)
    }
}
