//! Read surfaces of the oracle: the cross-component trait consumed by the
//! delegator, batch getters for off-platform indexers, and state snapshots.

use crate::committee::{AccountRecord, CommitteeMetadata};
use crate::error::OracleError;
use crate::oracle::CommitteeOracle;
use caucus_store::{AccountIds, PageSetMeta, StoredMember};
use caucus_types::{CommitteeId, Identity};
use serde::{Deserialize, Serialize};

/// Read-only membership queries a delegator needs from the canonical oracle.
pub trait MembershipOracle {
    /// See [`CommitteeOracle::get_committee_metadata`]. Unknown committees are an
    /// error, never empty metadata.
    fn committee_metadata(
        &self,
        committee_id: &CommitteeId,
        must_be_complete: bool,
    ) -> Result<CommitteeMetadata, OracleError>;

    /// See [`CommitteeOracle::get_voting_power`].
    fn voting_power(&self, committee_id: &CommitteeId, identity: &Identity)
        -> Result<u32, OracleError>;

    /// Escrow identity of the external registry allowed to create proposals.
    fn registry_escrow(&self) -> Option<Identity>;
}

impl MembershipOracle for CommitteeOracle {
    fn committee_metadata(
        &self,
        committee_id: &CommitteeId,
        must_be_complete: bool,
    ) -> Result<CommitteeMetadata, OracleError> {
        self.get_committee_metadata(committee_id, must_be_complete)
    }

    fn voting_power(
        &self,
        committee_id: &CommitteeId,
        identity: &Identity,
    ) -> Result<u32, OracleError> {
        self.get_voting_power(committee_id, identity)
    }

    fn registry_escrow(&self) -> Option<Identity> {
        self.registry_escrow
    }
}

/// A window of raw committee pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteePages {
    /// Present only when requested and the committee exists.
    pub metadata: Option<(CommitteeMetadata, PageSetMeta)>,
    /// One entry per requested page; empty for pages past the end.
    pub pages: Vec<Vec<u8>>,
}

impl CommitteeOracle {
    /// Account id and committee offsets of `identity`. Unknown identities get the
    /// zero record rather than an error.
    pub fn get_account(&self, identity: &Identity) -> AccountRecord {
        match self.accounts.lookup(identity) {
            Some(id) => AccountRecord {
                id,
                committee_offsets: self.hints.for_account(id).to_vec(),
            },
            None => AccountRecord::default(),
        }
    }

    pub fn accounts_batch(&self, identities: &[Identity]) -> Vec<AccountRecord> {
        identities.iter().map(|i| self.get_account(i)).collect()
    }

    pub fn committee_metadata_batch(
        &self,
        committee_ids: &[CommitteeId],
    ) -> Vec<Option<CommitteeMetadata>> {
        committee_ids
            .iter()
            .map(|id| self.committees.get(id).map(|e| e.metadata.clone()))
            .collect()
    }

    /// Ids of every registered committee, in ascending order.
    pub fn committee_ids(&self) -> Vec<CommitteeId> {
        let mut ids: Vec<_> = self.committees.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn page_set_meta(&self, committee_id: &CommitteeId) -> Result<&PageSetMeta, OracleError> {
        Ok(self.committee_entry(committee_id)?.members.meta())
    }

    /// Number of members stored for the committee.
    pub fn ingested_members(&self, committee_id: &CommitteeId) -> Result<u64, OracleError> {
        Ok(self.committee_entry(committee_id)?.members.len())
    }

    /// Raw pages `[start_page, start_page + page_count)` of a committee.
    ///
    /// Unknown committees yield no metadata and empty pages, so an indexer can
    /// probe without special casing.
    pub fn committee_pages(
        &self,
        committee_id: &CommitteeId,
        with_metadata: bool,
        start_page: usize,
        page_count: usize,
    ) -> CommitteePages {
        let Some(entry) = self.committees.get(committee_id) else {
            return CommitteePages {
                metadata: None,
                pages: vec![Vec::new(); page_count],
            };
        };
        let metadata = with_metadata
            .then(|| (entry.metadata.clone(), entry.members.meta().clone()));
        let pages = (start_page..start_page.saturating_add(page_count))
            .map(|i| entry.members.page(i).map(<[u8]>::to_vec).unwrap_or_default())
            .collect();
        CommitteePages { metadata, pages }
    }

    /// Every member of a committee in ingestion order.
    pub fn committee_members(
        &self,
        committee_id: &CommitteeId,
    ) -> Result<Vec<StoredMember>, OracleError> {
        let members = &self.committee_entry(committee_id)?.members;
        let pages: Vec<&[u8]> = (0..members.meta().page_count())
            .filter_map(|i| members.page(i))
            .collect();
        Ok(caucus_store::decode_members(&pages)?)
    }

    // ── Snapshots ────────────────────────────────────────────────────────

    /// Serialize the full oracle state with bincode.
    pub fn save_state(&self) -> Result<Vec<u8>, OracleError> {
        bincode::serialize(self).map_err(|e| OracleError::Snapshot(e.to_string()))
    }

    /// Restore an oracle from [`save_state`](Self::save_state) output.
    pub fn load_state(bytes: &[u8]) -> Result<Self, OracleError> {
        let oracle: Self =
            bincode::deserialize(bytes).map_err(|e| OracleError::Snapshot(e.to_string()))?;
        oracle
            .config
            .validate()
            .map_err(|e| OracleError::Snapshot(e.to_string()))?;
        for (committee_id, entry) in &oracle.committees {
            let corrupt =
                |reason: String| OracleError::Snapshot(format!("{committee_id}: {reason}"));
            entry
                .members
                .validate()
                .map_err(|e| corrupt(e.to_string()))?;
            let record_size = entry.members.meta().record_size;
            if record_size as usize != StoredMember::SIZE {
                return Err(corrupt(format!(
                    "record size {record_size} is not a member record"
                )));
            }
        }
        tracing::info!(
            committees = oracle.committees.len(),
            accounts = oracle.accounts.len(),
            "oracle state loaded"
        );
        Ok(oracle)
    }
}
