//! Paper trading account for a single funding carry position.
//!
//! The account is either closed (no notional) or holds one hedged carry
//! position. Every action is applied in full or not at all:
//! - Enter: checks the threshold and available cash, pays the entry fee
//! - Accrue: books one day of funding minus borrow on the open notional
//! - Exit: returns the notional less the exit fee

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::trading::CarryCosts;

/// Point-in-time view of the account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub cash: Decimal,
    pub notional: Decimal,
    pub is_open: bool,
}

/// Result of an Enter action.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Position opened; `fee` was paid on top of the notional
    Opened { notional: Decimal, fee: Decimal },
    /// A position is already open
    AlreadyOpen,
    /// Net daily return after costs is under the entry threshold
    BelowThreshold { net: Decimal, threshold: Decimal },
    /// Cash cannot cover notional plus entry fee
    InsufficientCash { required: Decimal, available: Decimal },
    /// Requested notional was zero or negative
    NonPositiveNotional,
}

impl EntryOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, Self::Opened { .. })
    }

    /// Human-readable outcome for display.
    pub fn message(&self) -> String {
        match self {
            Self::Opened { notional, fee } => {
                format!("Carry opened: ${:.2} notional, entry fee ${:.2}", notional, fee)
            }
            Self::AlreadyOpen => "Carry already open.".to_string(),
            Self::BelowThreshold { net, threshold } => format!(
                "Net daily % below threshold ({:.3}% < {:.3}%).",
                net * dec!(100),
                threshold * dec!(100)
            ),
            Self::InsufficientCash { required, available } => format!(
                "Cannot open carry: insufficient cash (need ${:.2}, have ${:.2}).",
                required, available
            ),
            Self::NonPositiveNotional => "Hedge notional must be positive.".to_string(),
        }
    }
}

impl std::fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Cash movement of a completed exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitFill {
    pub notional: Decimal,
    pub fee: Decimal,
    /// Cash returned to the account (notional - fee)
    pub proceeds: Decimal,
}

/// Simulated cash account holding at most one carry position.
#[derive(Debug, Clone)]
pub struct PaperAccount {
    initial_cash: Decimal,
    cash: Decimal,
    notional: Decimal,
    is_open: bool,
    total_fees: Decimal,
    total_carry: Decimal,
    days_accrued: u32,
    round_trips: u32,
    started_at: DateTime<Utc>,
}

impl PaperAccount {
    /// Open a closed account funded with `equity`.
    pub fn new(equity: Decimal) -> Self {
        Self {
            initial_cash: equity,
            cash: equity,
            notional: Decimal::ZERO,
            is_open: false,
            total_fees: Decimal::ZERO,
            total_carry: Decimal::ZERO,
            days_accrued: 0,
            round_trips: 0,
            started_at: Utc::now(),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn notional(&self) -> Decimal {
        self.notional
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            cash: self.cash,
            notional: self.notional,
            is_open: self.is_open,
        }
    }

    /// Try to open a carry position of `notional_usd`.
    ///
    /// Checks run in order: already open, threshold, cash. A failed check
    /// leaves the account untouched.
    pub fn enter(&mut self, notional_usd: Decimal, costs: &CarryCosts) -> EntryOutcome {
        if self.is_open {
            info!(notional = %self.notional, "Carry already open");
            return EntryOutcome::AlreadyOpen;
        }

        if notional_usd <= Decimal::ZERO {
            warn!(notional = %notional_usd, "Rejected entry: non-positive notional");
            return EntryOutcome::NonPositiveNotional;
        }

        let quote = costs.quote();
        if !quote.clears_threshold() {
            warn!(
                net = %quote.net_daily_pct,
                threshold = %quote.threshold_pct,
                "Rejected entry: net daily below threshold"
            );
            return EntryOutcome::BelowThreshold {
                net: quote.net_daily_pct,
                threshold: quote.threshold_pct,
            };
        }

        let fee = notional_usd * costs.entry_cost_rate();
        let required = notional_usd + fee;
        if self.cash < required {
            warn!(
                required = %required,
                cash = %self.cash,
                "Rejected entry: insufficient cash"
            );
            return EntryOutcome::InsufficientCash {
                required,
                available: self.cash,
            };
        }

        self.cash -= required;
        self.notional = notional_usd;
        self.is_open = true;
        self.total_fees += fee;

        info!(notional = %notional_usd, fee = %fee, cash = %self.cash, "Carry opened");

        EntryOutcome::Opened {
            notional: notional_usd,
            fee,
        }
    }

    /// Book one day of carry. Returns the amount accrued, or `None` when no
    /// position is open.
    pub fn accrue(&mut self, costs: &CarryCosts) -> Option<Decimal> {
        if !self.is_open {
            debug!("Accrue ignored: no open carry");
            return None;
        }

        let carry = costs.daily_carry_rate() * self.notional;
        self.cash += carry;
        self.total_carry += carry;
        self.days_accrued += 1;

        info!(carry = %carry, cash = %self.cash, day = self.days_accrued, "Accrued funding");

        Some(carry)
    }

    /// Book `days` days of carry. Returns the total accrued.
    pub fn accrue_days(&mut self, days: u32, costs: &CarryCosts) -> Option<Decimal> {
        if !self.is_open {
            debug!("Accrue ignored: no open carry");
            return None;
        }

        let mut total = Decimal::ZERO;
        for _ in 0..days {
            total += self.accrue(costs)?;
        }
        Some(total)
    }

    /// Close the open position. Returns `None` when nothing is open.
    pub fn exit(&mut self, costs: &CarryCosts) -> Option<ExitFill> {
        if !self.is_open {
            debug!("Exit ignored: no open carry");
            return None;
        }

        let notional = self.notional;
        let fee = notional * costs.exit_cost_rate();
        let proceeds = notional - fee;

        self.cash += proceeds;
        self.notional = Decimal::ZERO;
        self.is_open = false;
        self.total_fees += fee;
        self.round_trips += 1;

        info!(notional = %notional, fee = %fee, cash = %self.cash, "Carry closed");

        Some(ExitFill {
            notional,
            fee,
            proceeds,
        })
    }

    /// Session statistics.
    pub fn stats(&self) -> PaperStats {
        // Open notional is still owned by the account
        let equity = self.cash + self.notional;
        let return_pct = if self.initial_cash.is_zero() {
            Decimal::ZERO
        } else {
            (equity - self.initial_cash) / self.initial_cash
        };

        PaperStats {
            initial_cash: self.initial_cash,
            cash: self.cash,
            notional: self.notional,
            is_open: self.is_open,
            equity,
            total_pnl: equity - self.initial_cash,
            return_pct,
            total_carry: self.total_carry,
            total_fees: self.total_fees,
            days_accrued: self.days_accrued,
            round_trips: self.round_trips,
            running_since: self.started_at,
        }
    }
}

/// Paper trading statistics.
#[derive(Debug, Clone, Serialize)]
pub struct PaperStats {
    pub initial_cash: Decimal,
    pub cash: Decimal,
    pub notional: Decimal,
    pub is_open: bool,
    pub equity: Decimal,
    pub total_pnl: Decimal,
    pub return_pct: Decimal,
    pub total_carry: Decimal,
    pub total_fees: Decimal,
    pub days_accrued: u32,
    pub round_trips: u32,
    pub running_since: DateTime<Utc>,
}

impl std::fmt::Display for PaperStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n{:=^50}", " PAPER CARRY ")?;
        writeln!(f, "Running since: {}", self.running_since.format("%Y-%m-%d %H:%M"))?;
        writeln!(f)?;
        writeln!(f, "Initial Cash:     ${:.2}", self.initial_cash)?;
        writeln!(f, "Cash:             ${:.2}", self.cash)?;
        writeln!(f, "Notional:         ${:.2}", self.notional)?;
        writeln!(f, "Carry Open?       {}", if self.is_open { "Yes" } else { "No" })?;
        writeln!(f)?;
        writeln!(f, "Carry Accrued:    ${:.2} over {} days", self.total_carry, self.days_accrued)?;
        writeln!(f, "Total Fees:       ${:.2}", self.total_fees)?;
        writeln!(f, "Total P&L:        ${:.2} ({:.2}%)",
            self.total_pnl, self.return_pct * dec!(100))?;
        writeln!(f, "Round Trips:      {}", self.round_trips)?;
        writeln!(f, "{:=^50}", "")?;
        Ok(())
    }
}
