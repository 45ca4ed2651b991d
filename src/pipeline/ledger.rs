use super::{PipelineError, ProbeStatus, StepOutcome};

/// Append-only record of the outcomes of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLedger {
    outcomes: Vec<StepOutcome>,
}

impl StepLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: StepOutcome) -> Result<&StepOutcome, PipelineError> {
        let expected = self.outcomes.len();
        if outcome.index != expected {
            return Err(PipelineError::LedgerOutOfOrder {
                expected,
                actual: outcome.index,
            });
        }
        self.outcomes.push(outcome);
        Ok(&self.outcomes[expected])
    }

    pub fn get(&self, index: usize) -> Result<&StepOutcome, PipelineError> {
        self.outcomes
            .get(index)
            .ok_or(PipelineError::LedgerEntryNotFound {
                index,
                recorded: self.outcomes.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    pub fn statuses(&self) -> impl Iterator<Item = ProbeStatus> + '_ {
        self.outcomes.iter().map(|outcome| outcome.status)
    }

    pub fn into_outcomes(self) -> Vec<StepOutcome> {
        self.outcomes
    }
}
