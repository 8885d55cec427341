//! Nullable vote sink: records submitted external votes.

use caucus_delegator::{DelegatorError, ExternalVote, ExternalVoteSink};
use caucus_types::ProposalId;

/// An [`ExternalVoteSink`] that keeps every accepted submission.
#[derive(Default)]
pub struct NullVoteSink {
    submissions: Vec<(ProposalId, Vec<ExternalVote>)>,
    fail_with: Option<String>,
}

impl NullVoteSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next submission with `reason`.
    pub fn fail_next(&mut self, reason: &str) {
        self.fail_with = Some(reason.to_string());
    }

    pub fn submissions(&self) -> &[(ProposalId, Vec<ExternalVote>)] {
        &self.submissions
    }

    /// Votes accepted for `proposal`, across all submissions.
    pub fn votes_for(&self, proposal: ProposalId) -> Vec<ExternalVote> {
        self.submissions
            .iter()
            .filter(|(id, _)| *id == proposal)
            .flat_map(|(_, votes)| votes.iter().copied())
            .collect()
    }
}

impl ExternalVoteSink for NullVoteSink {
    fn submit_votes(
        &mut self,
        proposal: ProposalId,
        votes: &[ExternalVote],
    ) -> Result<(), DelegatorError> {
        if let Some(reason) = self.fail_with.take() {
            return Err(DelegatorError::Sink(reason));
        }
        self.submissions.push((proposal, votes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caucus_types::Identity;

    #[test]
    fn test_records_and_fails_once() {
        let mut sink = NullVoteSink::new();
        let vote = ExternalVote {
            identity: Identity::new([1; 32]),
            approvals: 3,
            rejections: 1,
        };
        sink.fail_next("registry offline");
        assert_eq!(
            sink.submit_votes(ProposalId::new(1), &[vote]),
            Err(DelegatorError::Sink("registry offline".to_string()))
        );
        sink.submit_votes(ProposalId::new(1), &[vote]).unwrap();
        assert_eq!(sink.votes_for(ProposalId::new(1)), vec![vote]);
        assert!(sink.votes_for(ProposalId::new(2)).is_empty());
        assert_eq!(sink.submissions().len(), 1);
    }
}
