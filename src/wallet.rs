use crate::error::{GameError, Result};

/// Score points per coin earned.
pub const SCORE_PER_COIN: u32 = 10;

/// The player's coin balance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    coins: u32,
}

impl Wallet {
    pub fn new(coins: u32) -> Self {
        Self { coins }
    }

    pub fn balance(&self) -> u32 {
        self.coins
    }

    pub fn deposit(&mut self, amount: u32) -> u32 {
        self.coins = self.coins.saturating_add(amount);
        self.coins
    }

    pub fn withdraw(&mut self, amount: u32) -> Result<u32> {
        if amount > self.coins {
            return Err(GameError::InsufficientFunds {
                balance: self.coins,
                requested: amount,
            });
        }
        self.coins -= amount;
        Ok(self.coins)
    }

    /// Coins a finished game with `score` pays out.
    pub fn coins_for_score(score: u32) -> u32 {
        score / SCORE_PER_COIN
    }
}
