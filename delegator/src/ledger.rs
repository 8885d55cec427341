//! Period-keyed algohour ledger.
//!
//! Hours are recorded per `(period, account)` and summed into per-period totals.
//! Periods are keyed by their start, which must be a multiple of the period
//! length. A period's totals can be attested final; only final periods may back
//! a proposal, and final periods refuse further changes until unfinalized.

use crate::error::DelegatorError;
use caucus_types::{AccountId, Identity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Total hours of one period and whether they are attested final.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub total_hours: u64,
    pub is_final: bool,
}

/// Hours earned by an identity in one period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgoHourInput {
    pub identity: Identity,
    pub hours: u64,
}

impl AlgoHourInput {
    pub fn new(identity: Identity, hours: u64) -> Self {
        Self { identity, hours }
    }
}

/// An input with its resolved account id.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HoursEntry {
    pub identity: Identity,
    pub account_id: AccountId,
    pub hours: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeriodLedger {
    period_length: u64,
    totals: BTreeMap<u64, PeriodTotals>,
    hours: BTreeMap<(u64, AccountId), u64>,
}

impl PeriodLedger {
    pub fn new(period_length: u64) -> Result<Self, DelegatorError> {
        if period_length == 0 {
            return Err(DelegatorError::Config(
                "period_length must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            period_length,
            totals: BTreeMap::new(),
            hours: BTreeMap::new(),
        })
    }

    pub fn period_length(&self) -> u64 {
        self.period_length
    }

    pub fn ensure_period_start(&self, period: u64) -> Result<(), DelegatorError> {
        if period % self.period_length != 0 {
            return Err(DelegatorError::PeriodStartInvalid {
                period,
                period_length: self.period_length,
            });
        }
        Ok(())
    }

    /// Period starts covering `[start, end)`.
    pub fn periods(
        &self,
        start: u64,
        end: u64,
    ) -> Result<impl Iterator<Item = u64>, DelegatorError> {
        if end <= start {
            return Err(DelegatorError::PeriodEndNotAfterStart { start, end });
        }
        self.ensure_period_start(start)?;
        if end % self.period_length != 0 {
            return Err(DelegatorError::PeriodEndInvalid {
                period: end,
                period_length: self.period_length,
            });
        }
        let step = self.period_length;
        Ok(std::iter::successors(Some(start), move |p| p.checked_add(step))
            .take_while(move |p| *p < end))
    }

    /// Totals of `period`; zero and not final when nothing was recorded.
    pub fn totals(&self, period: u64) -> Result<PeriodTotals, DelegatorError> {
        self.ensure_period_start(period)?;
        Ok(self.totals.get(&period).copied().unwrap_or_default())
    }

    /// Hours of `account` in `period`, zero when absent.
    pub fn hours(&self, period: u64, account: AccountId) -> Result<u64, DelegatorError> {
        self.ensure_period_start(period)?;
        Ok(self.hours.get(&(period, account)).copied().unwrap_or(0))
    }

    /// Hours of `account` summed over `[start, end)`.
    pub fn aggregated_hours(
        &self,
        start: u64,
        end: u64,
        account: AccountId,
    ) -> Result<u64, DelegatorError> {
        let mut sum = 0u64;
        for period in self.periods(start, end)? {
            let hours = self.hours.get(&(period, account)).copied().unwrap_or(0);
            sum = sum
                .checked_add(hours)
                .ok_or(DelegatorError::AlgoHoursOverflow { period })?;
        }
        Ok(sum)
    }

    /// Total hours over `[start, end)`; every covered period must exist and be final.
    pub fn finalized_total(&self, start: u64, end: u64) -> Result<u64, DelegatorError> {
        let mut sum = 0u64;
        for period in self.periods(start, end)? {
            let totals = self
                .totals
                .get(&period)
                .ok_or(DelegatorError::PeriodNotExists { period })?;
            if !totals.is_final {
                return Err(DelegatorError::PeriodNotFinal { period });
            }
            sum = sum
                .checked_add(totals.total_hours)
                .ok_or(DelegatorError::AlgoHoursOverflow { period })?;
        }
        Ok(sum)
    }

    fn ensure_mutable(&self, period: u64) -> Result<(), DelegatorError> {
        self.ensure_period_start(period)?;
        match self.totals.get(&period) {
            Some(totals) if totals.is_final => Err(DelegatorError::PeriodFinal { period }),
            _ => Ok(()),
        }
    }

    /// Record new hours. Returns the period's new total.
    pub(crate) fn add_hours(
        &mut self,
        period: u64,
        entries: &[HoursEntry],
    ) -> Result<u64, DelegatorError> {
        self.ensure_mutable(period)?;
        let current = self.totals.get(&period).map_or(0, |t| t.total_hours);
        let mut total = current;
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            if self.hours.contains_key(&(period, entry.account_id)) || !seen.insert(entry.account_id)
            {
                return Err(DelegatorError::AlgoHoursExist {
                    period,
                    account: entry.identity,
                });
            }
            total = total
                .checked_add(entry.hours)
                .ok_or(DelegatorError::AlgoHoursOverflow { period })?;
        }
        if entries.is_empty() {
            return Ok(current);
        }

        for entry in entries {
            self.hours.insert((period, entry.account_id), entry.hours);
        }
        self.totals.entry(period).or_default().total_hours = total;
        Ok(total)
    }

    /// Delete recorded hours; each entry must match what is stored. Returns the new total.
    pub(crate) fn remove_hours(
        &mut self,
        period: u64,
        entries: &[HoursEntry],
    ) -> Result<u64, DelegatorError> {
        self.ensure_mutable(period)?;
        let mut seen = HashSet::with_capacity(entries.len());
        let mut removed = 0u64;
        for entry in entries {
            let stored = match self.hours.get(&(period, entry.account_id)) {
                Some(stored) if seen.insert(entry.account_id) => *stored,
                _ => {
                    return Err(DelegatorError::AccountHoursNotExist {
                        period,
                        account: entry.identity,
                    })
                }
            };
            if stored != entry.hours {
                return Err(DelegatorError::AlgoHoursMismatch {
                    period,
                    expected: entry.hours,
                    actual: stored,
                });
            }
            removed = removed
                .checked_add(stored)
                .ok_or(DelegatorError::AlgoHoursOverflow { period })?;
        }
        let current = self
            .totals
            .get(&period)
            .map(|t| t.total_hours)
            .ok_or(DelegatorError::PeriodNotExists { period })?;
        let total = current
            .checked_sub(removed)
            .ok_or(DelegatorError::AlgoHoursMismatch {
                period,
                expected: removed,
                actual: current,
            })?;

        for entry in entries {
            self.hours.remove(&(period, entry.account_id));
        }
        self.totals.entry(period).or_default().total_hours = total;
        Ok(total)
    }

    /// Attest (or withdraw) finality. `total_hours` must match the recorded total.
    pub fn set_finality(
        &mut self,
        period: u64,
        total_hours: u64,
        is_final: bool,
    ) -> Result<(), DelegatorError> {
        self.ensure_period_start(period)?;
        let totals = self
            .totals
            .get_mut(&period)
            .ok_or(DelegatorError::PeriodNotExists { period })?;
        if totals.total_hours != total_hours {
            return Err(DelegatorError::AlgoHoursMismatch {
                period,
                expected: total_hours,
                actual: totals.total_hours,
            });
        }
        totals.is_final = is_final;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const L: u64 = 1_000_000;

    fn entry(seed: u8, hours: u64) -> HoursEntry {
        HoursEntry {
            identity: Identity::new([seed; 32]),
            account_id: AccountId::new(u32::from(seed)),
            hours,
        }
    }

    fn ledger() -> PeriodLedger {
        PeriodLedger::new(L).unwrap()
    }

    // ── Alignment ────────────────────────────────────────────────────────

    #[test]
    fn test_zero_period_length_rejected() {
        assert!(matches!(PeriodLedger::new(0), Err(DelegatorError::Config(_))));
    }

    #[test]
    fn test_unaligned_period_rejected() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.add_hours(L + 1, &[entry(1, 5)]),
            Err(DelegatorError::PeriodStartInvalid { period: L + 1, period_length: L })
        );
        assert!(ledger.totals(123).is_err());
        assert!(ledger.hours(123, AccountId::new(1)).is_err());
    }

    #[test]
    fn test_periods_iterates_half_open_range() {
        let ledger = ledger();
        let periods: Vec<_> = ledger.periods(2 * L, 5 * L).unwrap().collect();
        assert_eq!(periods, vec![2 * L, 3 * L, 4 * L]);
        assert!(matches!(
            ledger.periods(3 * L, 3 * L),
            Err(DelegatorError::PeriodEndNotAfterStart { .. })
        ));
        assert!(matches!(
            ledger.periods(0, L + 5),
            Err(DelegatorError::PeriodEndInvalid { .. })
        ));
    }

    // ── Recording ────────────────────────────────────────────────────────

    #[test]
    fn test_add_accumulates_totals() {
        let mut ledger = ledger();
        assert_eq!(ledger.add_hours(0, &[entry(1, 10), entry(2, 20)]).unwrap(), 30);
        assert_eq!(ledger.add_hours(0, &[entry(3, 5)]).unwrap(), 35);
        assert_eq!(
            ledger.totals(0).unwrap(),
            PeriodTotals { total_hours: 35, is_final: false }
        );
        assert_eq!(ledger.hours(0, AccountId::new(2)).unwrap(), 20);
        assert_eq!(ledger.hours(L, AccountId::new(2)).unwrap(), 0);
    }

    #[test]
    fn test_add_existing_entry_changes_nothing() {
        let mut ledger = ledger();
        ledger.add_hours(0, &[entry(1, 10)]).unwrap();
        let err = ledger.add_hours(0, &[entry(2, 5), entry(1, 7)]).unwrap_err();
        assert!(matches!(err, DelegatorError::AlgoHoursExist { period: 0, .. }));
        assert_eq!(ledger.totals(0).unwrap().total_hours, 10);
        assert_eq!(ledger.hours(0, AccountId::new(2)).unwrap(), 0);

        // duplicate inside one batch
        assert!(ledger.add_hours(0, &[entry(3, 1), entry(3, 1)]).is_err());
    }

    #[test]
    fn test_empty_batch_creates_nothing() {
        let mut ledger = ledger();
        assert_eq!(ledger.add_hours(0, &[]).unwrap(), 0);
        assert_eq!(
            ledger.set_finality(0, 0, true),
            Err(DelegatorError::PeriodNotExists { period: 0 })
        );
    }

    #[test]
    fn test_remove_requires_exact_hours() {
        let mut ledger = ledger();
        ledger.add_hours(0, &[entry(1, 10), entry(2, 20)]).unwrap();
        assert_eq!(
            ledger.remove_hours(0, &[entry(2, 19)]),
            Err(DelegatorError::AlgoHoursMismatch { period: 0, expected: 19, actual: 20 })
        );
        assert!(matches!(
            ledger.remove_hours(0, &[entry(3, 1)]),
            Err(DelegatorError::AccountHoursNotExist { .. })
        ));
        assert!(matches!(
            ledger.remove_hours(0, &[entry(1, 10), entry(1, 10)]),
            Err(DelegatorError::AccountHoursNotExist { .. })
        ));
        assert_eq!(ledger.totals(0).unwrap().total_hours, 30);

        assert_eq!(ledger.remove_hours(0, &[entry(2, 20)]).unwrap(), 10);
        assert_eq!(ledger.hours(0, AccountId::new(2)).unwrap(), 0);
        // removed entry may be recorded again
        assert_eq!(ledger.add_hours(0, &[entry(2, 4)]).unwrap(), 14);
    }

    // ── Finality ─────────────────────────────────────────────────────────

    #[test]
    fn test_finality_requires_matching_total() {
        let mut ledger = ledger();
        ledger.add_hours(0, &[entry(1, 10)]).unwrap();
        assert_eq!(
            ledger.set_finality(0, 11, true),
            Err(DelegatorError::AlgoHoursMismatch { period: 0, expected: 11, actual: 10 })
        );
        ledger.set_finality(0, 10, true).unwrap();
        assert!(ledger.totals(0).unwrap().is_final);
    }

    #[test]
    fn test_final_period_is_frozen_until_unfinalized() {
        let mut ledger = ledger();
        ledger.add_hours(0, &[entry(1, 10)]).unwrap();
        ledger.set_finality(0, 10, true).unwrap();
        assert_eq!(
            ledger.add_hours(0, &[entry(2, 1)]),
            Err(DelegatorError::PeriodFinal { period: 0 })
        );
        assert_eq!(
            ledger.remove_hours(0, &[entry(1, 10)]),
            Err(DelegatorError::PeriodFinal { period: 0 })
        );
        ledger.set_finality(0, 10, false).unwrap();
        assert_eq!(ledger.add_hours(0, &[entry(2, 1)]).unwrap(), 11);
    }

    #[test]
    fn test_finalized_total_and_aggregation() {
        let mut ledger = ledger();
        ledger.add_hours(0, &[entry(1, 10), entry(2, 30)]).unwrap();
        ledger.add_hours(L, &[entry(1, 5)]).unwrap();

        assert_eq!(
            ledger.finalized_total(0, 2 * L),
            Err(DelegatorError::PeriodNotFinal { period: 0 })
        );
        ledger.set_finality(0, 40, true).unwrap();
        assert_eq!(
            ledger.finalized_total(0, 2 * L),
            Err(DelegatorError::PeriodNotFinal { period: L })
        );
        ledger.set_finality(L, 5, true).unwrap();
        assert_eq!(ledger.finalized_total(0, 2 * L).unwrap(), 45);
        assert_eq!(
            ledger.finalized_total(0, 3 * L),
            Err(DelegatorError::PeriodNotExists { period: 2 * L })
        );

        assert_eq!(ledger.aggregated_hours(0, 2 * L, AccountId::new(1)).unwrap(), 15);
        assert_eq!(ledger.aggregated_hours(0, 3 * L, AccountId::new(2)).unwrap(), 30);
        assert_eq!(ledger.aggregated_hours(0, L, AccountId::new(9)).unwrap(), 0);
    }
}
