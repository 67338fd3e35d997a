//! Interactive paper trading session.
//!
//! Reads one command per line and applies it to the session's own
//! [`PaperAccount`]. Bad input is reported and the session keeps going.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::paper::{PaperAccount, PaperStats};
use crate::trading::{CarryCosts, SessionConfig};

/// A user action typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PaperCommand {
    /// Open a carry; `None` uses the configured default notional
    Enter(Option<Decimal>),
    Accrue(u32),
    Exit,
    Status,
    Quote,
    Help,
    Quit,
}

impl PaperCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            bail!("Empty command");
        };
        let verb = verb.to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("Too many arguments for '{}'", verb);
        }

        let command = match (verb.as_str(), arg) {
            ("enter" | "e", None) => Self::Enter(None),
            ("enter" | "e", Some(raw)) => {
                let notional: Decimal = raw
                    .trim_start_matches('$')
                    .replace(',', "")
                    .parse()
                    .with_context(|| format!("Invalid notional '{}'", raw))?;
                Self::Enter(Some(notional))
            }
            ("accrue" | "a", None) => Self::Accrue(1),
            ("accrue" | "a", Some(raw)) => {
                let days: u32 = raw
                    .parse()
                    .with_context(|| format!("Invalid day count '{}'", raw))?;
                Self::Accrue(days)
            }
            ("exit" | "x", None) => Self::Exit,
            ("status" | "s", None) => Self::Status,
            ("quote" | "q", None) => Self::Quote,
            ("help" | "h" | "?", None) => Self::Help,
            ("quit", None) => Self::Quit,
            (_, Some(_)) if matches!(verb.as_str(), "exit" | "status" | "quote" | "help" | "quit") => {
                bail!("'{}' takes no arguments", verb)
            }
            _ => bail!("Unknown command '{}' (type 'help')", verb),
        };
        Ok(command)
    }
}

const HELP: &str = "\
Commands:
  enter [notional]  Open the carry (default notional if omitted)
  accrue [days]     Accrue funding for one or more days
  exit              Close the carry
  status            Show cash, notional and open state
  quote             Show the current carry quote
  help              Show this help
  quit              End the session";

/// One user's paper trading session.
pub struct Session {
    account: PaperAccount,
    costs: CarryCosts,
    default_notional: Decimal,
    max_notional: Decimal,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        Ok(Self {
            account: PaperAccount::new(config.risk.equity),
            costs: config.costs.costs(),
            default_notional: config.risk.default_notional()?,
            max_notional: config.risk.max_notional()?,
        })
    }

    pub fn account(&self) -> &PaperAccount {
        &self.account
    }

    pub fn stats(&self) -> PaperStats {
        self.account.stats()
    }

    /// Apply one command and return the text to show the user.
    /// Returns `None` for [`PaperCommand::Quit`].
    pub fn apply(&mut self, command: PaperCommand) -> Option<String> {
        debug!(command = ?command, "Applying command");

        let reply = match command {
            PaperCommand::Enter(requested) => {
                let notional = requested.unwrap_or(self.default_notional);
                if notional > self.max_notional {
                    format!(
                        "Notional ${:.2} exceeds the leverage cap of ${:.2}.",
                        notional, self.max_notional
                    )
                } else {
                    self.account.enter(notional, &self.costs).message()
                }
            }
            PaperCommand::Accrue(days) => match self.account.accrue_days(days, &self.costs) {
                Some(carry) => format!("Accrued: ${:.2}", carry),
                None => "No open carry to accrue.".to_string(),
            },
            PaperCommand::Exit => match self.account.exit(&self.costs) {
                Some(fill) => format!(
                    "Carry closed: ${:.2} returned after ${:.2} exit fee.",
                    fill.proceeds, fill.fee
                ),
                None => "No open carry to exit.".to_string(),
            },
            PaperCommand::Status => {
                let snap = self.account.snapshot();
                format!(
                    "Equity: ${:.2} | Notional: ${:.2} | Carry Open? {}",
                    snap.cash,
                    snap.notional,
                    if snap.is_open { "Yes" } else { "No" }
                )
            }
            PaperCommand::Quote => self.costs.quote().to_string(),
            PaperCommand::Help => HELP.to_string(),
            PaperCommand::Quit => return None,
        };
        Some(reply)
    }

    /// Drive the session from `input` until EOF or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        info!(cash = %self.account.cash(), "Paper session started");
        writeln!(output, "{}", HELP)?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let command = match PaperCommand::parse(line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(output, "Error: {:#}", e)?;
                    continue;
                }
            };

            match self.apply(command) {
                Some(reply) => writeln!(
                    output,
                    "[{}] {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    reply
                )?,
                None => break,
            }
        }

        info!(cash = %self.account.cash(), "Paper session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lenient_config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.costs.funding_annual = dec!(0.5);
        config.costs.min_net_daily = Decimal::ZERO;
        config
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(PaperCommand::parse("enter").unwrap(), PaperCommand::Enter(None));
        assert_eq!(
            PaperCommand::parse("ENTER $5,000").unwrap(),
            PaperCommand::Enter(Some(dec!(5000)))
        );
        assert_eq!(PaperCommand::parse("accrue").unwrap(), PaperCommand::Accrue(1));
        assert_eq!(PaperCommand::parse("a 7").unwrap(), PaperCommand::Accrue(7));
        assert_eq!(PaperCommand::parse("  exit ").unwrap(), PaperCommand::Exit);
        assert_eq!(PaperCommand::parse("quit").unwrap(), PaperCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(PaperCommand::parse("").is_err());
        assert!(PaperCommand::parse("enter lots").is_err());
        assert!(PaperCommand::parse("accrue -1").is_err());
        assert!(PaperCommand::parse("exit now").is_err());
        assert!(PaperCommand::parse("buy 5").is_err());
        assert!(PaperCommand::parse("enter 1 2").is_err());
    }

    #[test]
    fn test_default_thresholds_block_entry() {
        let mut session = Session::new(&SessionConfig::default()).unwrap();
        let reply = session.apply(PaperCommand::Enter(None)).unwrap();
        assert!(reply.contains("below threshold"));
        assert!(!session.account().is_open());
    }

    #[test]
    fn test_enter_uses_default_notional() {
        let mut session = Session::new(&lenient_config()).unwrap();
        session.apply(PaperCommand::Enter(None));
        assert_eq!(session.account().notional(), dec!(5000));
    }

    #[test]
    fn test_enter_above_leverage_cap() {
        let mut session = Session::new(&lenient_config()).unwrap();
        let reply = session.apply(PaperCommand::Enter(Some(dec!(25000)))).unwrap();
        assert!(reply.contains("leverage cap"));
        assert!(!session.account().is_open());
    }

    #[test]
    fn test_new_rejects_unusable_leverage() {
        let mut config = lenient_config();
        config.risk.max_leverage = f64::INFINITY;
        assert!(Session::new(&config).is_err());
    }

    #[test]
    fn test_run_script() {
        let mut session = Session::new(&lenient_config()).unwrap();
        let script = "# warm up\nenter 5000\nbogus\naccrue 2\nstatus\nexit\nquit\nenter\n";
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Carry opened"));
        assert!(text.contains("Unknown command 'bogus'"));
        assert!(text.contains("Accrued:"));
        assert!(text.contains("Carry closed"));

        // Input after quit is ignored
        assert!(!session.account().is_open());
        assert_eq!(session.stats().round_trips, 1);
    }
}
