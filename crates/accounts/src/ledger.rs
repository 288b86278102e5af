use authorizer_core::{DomainError, DomainResult};

/// Credit-limit bookkeeping of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    active_card: bool,
    max_limit: i64,
    available_limit: i64,
}

impl Ledger {
    /// Fresh ledger with the whole limit available.
    pub fn new(active_card: bool, max_limit: i64) -> Self {
        Self {
            active_card,
            max_limit,
            available_limit: max_limit,
        }
    }

    /// Ledger restored from storage.
    pub fn from_parts(active_card: bool, max_limit: i64, available_limit: i64) -> Self {
        Self {
            active_card,
            max_limit,
            available_limit,
        }
    }

    pub fn active_card(&self) -> bool {
        self.active_card
    }

    pub fn max_limit(&self) -> i64 {
        self.max_limit
    }

    pub fn available_limit(&self) -> i64 {
        self.available_limit
    }

    /// Whether `amount` can be taken without the available limit going negative.
    pub fn has_funds_for(&self, amount: i64) -> bool {
        self.available_limit
            .checked_sub(amount)
            .is_some_and(|remaining| remaining >= 0)
    }

    /// Take `amount` from the available limit.
    pub fn debit(&mut self, amount: i64) -> DomainResult<()> {
        match self.available_limit.checked_sub(amount) {
            Some(remaining) if remaining >= 0 => {
                self.available_limit = remaining;
                Ok(())
            }
            _ => Err(DomainError::invariant("available limit cannot go negative")),
        }
    }
}
