//! The simulated mobile money (USSD) payment flow.
//!
//! The flow walks the user through entering an amount, picking a provider and
//! confirming. Confirming records a deposit through
//! [Ledger::add_transaction]; no money moves anywhere.

use std::{fmt::Display, str::FromStr};

use crate::{
    Error,
    goal::GoalId,
    ledger::Ledger,
    stores::KeyValueStore,
    transaction::{Amount, Transaction},
};

/// The smallest amount that can be paid by USSD.
pub const USSD_MINIMUM_AMOUNT: Amount = 100;

/// The wallet name used in notes when no provider is known.
const FALLBACK_WALLET: &str = "Mobile Money";

/// A mobile network operator offering a mobile money wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Airtel Money.
    Airtel,
    /// M-Pesa.
    Vodacom,
    /// Halopesa.
    Halotel,
    /// Tigo Pesa.
    Tigo,
}

impl Provider {
    /// All providers in the order they are offered.
    pub const ALL: [Provider; 4] = [
        Provider::Airtel,
        Provider::Vodacom,
        Provider::Halotel,
        Provider::Tigo,
    ];

    /// The short lowercase key, e.g. "airtel".
    pub fn key(&self) -> &'static str {
        match self {
            Provider::Airtel => "airtel",
            Provider::Vodacom => "vodacom",
            Provider::Halotel => "halotel",
            Provider::Tigo => "tigo",
        }
    }

    /// The operator's name, e.g. "Airtel Tanzania".
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Airtel => "Airtel Tanzania",
            Provider::Vodacom => "Vodacom Tanzania",
            Provider::Halotel => "Halotel Tanzania",
            Provider::Tigo => "Tigo Tanzania",
        }
    }

    /// The operator's mobile money wallet, e.g. "M-Pesa".
    pub fn wallet(&self) -> &'static str {
        match self {
            Provider::Airtel => "Airtel Money",
            Provider::Vodacom => "M-Pesa",
            Provider::Halotel => "Halopesa",
            Provider::Tigo => "Tigo Pesa",
        }
    }

    /// The USSD code the user dials to pay.
    pub fn dial_code(&self) -> &'static str {
        match self {
            Provider::Airtel => "*150*60#",
            Provider::Vodacom => "*150*00#",
            Provider::Halotel => "*150*88#",
            Provider::Tigo => "*150*01#",
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Provider::ALL
            .into_iter()
            .find(|provider| provider.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("\"{s}\" is not a mobile money provider"))
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The note recorded on a USSD deposit, e.g.
/// "USSD Payment via M-Pesa (Ref: QX12)".
pub fn payment_note(provider: Option<Provider>, reference: Option<&str>) -> String {
    let wallet = provider.map_or(FALLBACK_WALLET, |provider| provider.wallet());

    match reference.map(str::trim).filter(|reference| !reference.is_empty()) {
        Some(reference) => format!("USSD Payment via {wallet} (Ref: {reference})"),
        None => format!("USSD Payment via {wallet}"),
    }
}

/// The step a [UssdSession] is at.
#[derive(Debug, Clone, PartialEq)]
pub enum UssdStep {
    /// Waiting for the amount to pay.
    EnterAmount,
    /// Waiting for the user to pick a provider.
    SelectProvider {
        /// The amount entered in the previous step.
        amount: Amount,
    },
    /// Showing the dial code and waiting for confirmation.
    Confirm {
        /// The amount to pay.
        amount: Amount,
        /// The chosen provider.
        provider: Provider,
    },
    /// The payment has been recorded.
    Completed {
        /// The deposit that was recorded.
        transaction: Transaction,
        /// The provider paid through.
        provider: Provider,
    },
}

/// One run through the USSD payment flow for a single goal.
#[derive(Debug, Clone, PartialEq)]
pub struct UssdSession {
    goal_id: GoalId,
    step: UssdStep,
}

impl UssdSession {
    /// Start a payment towards the goal with `goal_id`.
    pub fn new(goal_id: GoalId) -> Self {
        Self {
            goal_id,
            step: UssdStep::EnterAmount,
        }
    }

    /// The goal being paid into.
    pub fn goal_id(&self) -> GoalId {
        self.goal_id
    }

    /// The current step.
    pub fn step(&self) -> &UssdStep {
        &self.step
    }

    /// Set the amount to pay and move on to choosing a provider.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::BelowUssdMinimum] if `amount` is less than
    ///   [USSD_MINIMUM_AMOUNT],
    /// - or [Error::UssdStepOutOfOrder] if the session is not waiting for an
    ///   amount.
    pub fn enter_amount(&mut self, amount: Amount) -> Result<(), Error> {
        if self.step != UssdStep::EnterAmount {
            return Err(Error::UssdStepOutOfOrder("enter an amount"));
        }

        if amount < USSD_MINIMUM_AMOUNT {
            return Err(Error::BelowUssdMinimum(amount));
        }

        self.step = UssdStep::SelectProvider { amount };

        Ok(())
    }

    /// Choose the provider to pay through and move on to confirmation.
    ///
    /// # Errors
    /// Returns an [Error::UssdStepOutOfOrder] if no amount has been entered.
    pub fn select_provider(&mut self, provider: Provider) -> Result<(), Error> {
        match self.step {
            UssdStep::SelectProvider { amount } => {
                self.step = UssdStep::Confirm { amount, provider };
                Ok(())
            }
            _ => Err(Error::UssdStepOutOfOrder("select a provider")),
        }
    }

    /// Go back from choosing a provider to entering the amount.
    ///
    /// # Errors
    /// Returns an [Error::UssdStepOutOfOrder] if the session is not choosing a
    /// provider.
    pub fn back(&mut self) -> Result<(), Error> {
        match self.step {
            UssdStep::SelectProvider { .. } => {
                self.step = UssdStep::EnterAmount;
                Ok(())
            }
            _ => Err(Error::UssdStepOutOfOrder("go back")),
        }
    }

    /// Go back from confirmation to choosing a provider, keeping the amount.
    ///
    /// # Errors
    /// Returns an [Error::UssdStepOutOfOrder] if the session is not waiting
    /// for confirmation.
    pub fn change_provider(&mut self) -> Result<(), Error> {
        match self.step {
            UssdStep::Confirm { amount, .. } => {
                self.step = UssdStep::SelectProvider { amount };
                Ok(())
            }
            _ => Err(Error::UssdStepOutOfOrder("change the provider")),
        }
    }

    /// Record the payment in `ledger`.
    ///
    /// `reference` is the optional transaction code the provider sent back,
    /// it is added to the note.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UssdStepOutOfOrder] if the session is not waiting for
    ///   confirmation,
    /// - [Error::GoalNotFound] if the goal was deleted during the session,
    /// - or a storage error if the ledger could not be saved.
    ///
    /// The session stays at the confirmation step when recording fails.
    pub fn confirm<S: KeyValueStore>(
        &mut self,
        ledger: &mut Ledger<S>,
        reference: Option<&str>,
    ) -> Result<Transaction, Error> {
        let UssdStep::Confirm { amount, provider } = self.step else {
            return Err(Error::UssdStepOutOfOrder("confirm the payment"));
        };

        let note = payment_note(Some(provider), reference);
        let transaction = ledger.add_transaction(self.goal_id, amount, Some(&note))?;

        tracing::info!(
            "Recorded USSD payment of {amount} via {} for goal {}",
            provider.key(),
            self.goal_id
        );

        self.step = UssdStep::Completed {
            transaction: transaction.clone(),
            provider,
        };

        Ok(transaction)
    }
}
