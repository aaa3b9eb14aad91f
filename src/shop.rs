//! Upgrade shop
//!
//! Prices are kept exactly as the game has always computed them, including
//! the offsets tied to the default stat values.

use std::fmt;

use crate::consts::*;
use crate::sim::UpgradeStats;

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    Power,
    Aerodynamics,
    Bounciness,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [UpgradeKind::Power, UpgradeKind::Aerodynamics, UpgradeKind::Bounciness];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Power => "power",
            UpgradeKind::Aerodynamics => "aerodynamics",
            UpgradeKind::Bounciness => "bounciness",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "power" | "maxpower" => Some(UpgradeKind::Power),
            "aerodynamics" | "aero" => Some(UpgradeKind::Aerodynamics),
            "bounciness" | "bounce" => Some(UpgradeKind::Bounciness),
            _ => None,
        }
    }

    /// Stat increase per purchase
    pub fn step(&self) -> f32 {
        match self {
            UpgradeKind::Power => 1.0,
            UpgradeKind::Aerodynamics => 0.5,
            UpgradeKind::Bounciness => 0.1,
        }
    }

    /// Highest purchasable value
    pub fn cap(&self) -> f32 {
        match self {
            UpgradeKind::Power => MAX_POWER_CAP,
            UpgradeKind::Aerodynamics => AERODYNAMICS_CAP,
            UpgradeKind::Bounciness => BOUNCINESS_CAP,
        }
    }

    pub fn value(&self, stats: &UpgradeStats) -> f32 {
        match self {
            UpgradeKind::Power => stats.max_power,
            UpgradeKind::Aerodynamics => stats.aerodynamics,
            UpgradeKind::Bounciness => stats.bounciness,
        }
    }

    fn value_mut<'a>(&self, stats: &'a mut UpgradeStats) -> &'a mut f32 {
        match self {
            UpgradeKind::Power => &mut stats.max_power,
            UpgradeKind::Aerodynamics => &mut stats.aerodynamics,
            UpgradeKind::Bounciness => &mut stats.bounciness,
        }
    }
}

/// `floor(100 · 1.5^(max_power - 15))`
pub fn power_cost(stats: &UpgradeStats) -> u64 {
    (100.0 * 1.5_f64.powf(stats.max_power as f64 - 15.0)).floor() as u64
}

/// `floor(100 · 1.5^((aerodynamics - 0.99) · 1000))`
pub fn aero_cost(stats: &UpgradeStats) -> u64 {
    (100.0 * 1.5_f64.powf((stats.aerodynamics as f64 - 0.99) * 1000.0)).floor() as u64
}

/// `floor(100 · 1.5^((bounciness - 0.3) · 10))`
pub fn bounce_cost(stats: &UpgradeStats) -> u64 {
    (100.0 * 1.5_f64.powf((stats.bounciness as f64 - 0.3) * 10.0)).floor() as u64
}

/// Flat price charged for an aerodynamics point
pub const AERO_PRICE: u64 = 150;
/// Flat price charged for a bounciness step
pub const BOUNCE_PRICE: u64 = 200;

/// Formula quote for an upgrade at the current stats
pub fn quote(kind: UpgradeKind, stats: &UpgradeStats) -> u64 {
    match kind {
        UpgradeKind::Power => power_cost(stats),
        UpgradeKind::Aerodynamics => aero_cost(stats),
        UpgradeKind::Bounciness => bounce_cost(stats),
    }
}

/// What a purchase actually charges: power follows its formula, the other two
/// are flat
pub fn price(kind: UpgradeKind, stats: &UpgradeStats) -> u64 {
    match kind {
        UpgradeKind::Power => power_cost(stats),
        UpgradeKind::Aerodynamics => AERO_PRICE,
        UpgradeKind::Bounciness => BOUNCE_PRICE,
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    /// Balance is below the price
    InsufficientFunds { price: u64, balance: u64 },
    /// Stat is already at its cap
    Maxed(UpgradeKind),
    /// The shop is closed while a shot is in flight
    ShotInFlight,
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientFunds { price, balance } => {
                write!(f, "need {} coins, have {}", price, balance)
            }
            PurchaseError::Maxed(kind) => write!(f, "{} is already maxed", kind.as_str()),
            PurchaseError::ShotInFlight => write!(f, "cannot shop while a shot is in flight"),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// True if `buy` would succeed
pub fn can_buy(kind: UpgradeKind, stats: &UpgradeStats) -> bool {
    check(kind, stats).is_ok()
}

fn check(kind: UpgradeKind, stats: &UpgradeStats) -> Result<u64, PurchaseError> {
    if kind.value(stats) >= kind.cap() {
        return Err(PurchaseError::Maxed(kind));
    }
    let price = price(kind, stats);
    if stats.money < price {
        return Err(PurchaseError::InsufficientFunds {
            price,
            balance: stats.money,
        });
    }
    Ok(price)
}

/// Buy one step of `kind`. Returns the price paid.
pub fn buy(stats: &mut UpgradeStats, kind: UpgradeKind) -> Result<u64, PurchaseError> {
    let price = check(kind, stats)?;
    stats.money -= price;
    let value = kind.value_mut(stats);
    // Round to hundredths so repeated 0.1 steps land exactly on the cap
    *value = (((*value + kind.step()) * 100.0).round() / 100.0).min(kind.cap());
    log::info!(
        "Bought {} for {} -> {:.2} ({} left)",
        kind.as_str(),
        price,
        kind.value(stats),
        stats.money
    );
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_formulas_at_defaults() {
        let stats = UpgradeStats::default();
        assert_eq!(power_cost(&stats), 100);
        assert_eq!(bounce_cost(&stats), 100);
        // 1.5^-990 floors to zero
        assert_eq!(aero_cost(&stats), 0);

        assert_eq!(quote(UpgradeKind::Bounciness, &stats), 100);
        assert_eq!(price(UpgradeKind::Bounciness, &stats), BOUNCE_PRICE);
        assert_eq!(quote(UpgradeKind::Power, &stats), price(UpgradeKind::Power, &stats));
    }

    #[test]
    fn test_power_cost_grows() {
        let stats = UpgradeStats {
            max_power: 17.0,
            ..Default::default()
        };
        assert_eq!(power_cost(&stats), 225);
    }

    #[test]
    fn test_buy_power() {
        let mut stats = UpgradeStats {
            money: 260,
            ..Default::default()
        };
        assert_eq!(buy(&mut stats, UpgradeKind::Power), Ok(100));
        assert_eq!(stats.max_power, 16.0);
        assert_eq!(stats.money, 160);
        // next costs 150
        assert_eq!(buy(&mut stats, UpgradeKind::Power), Ok(150));
        assert_eq!(
            buy(&mut stats, UpgradeKind::Power),
            Err(PurchaseError::InsufficientFunds { price: 225, balance: 10 })
        );
    }

    #[test]
    fn test_bounciness_steps_land_on_cap() {
        let mut stats = UpgradeStats {
            money: 10_000,
            ..Default::default()
        };
        for _ in 0..6 {
            buy(&mut stats, UpgradeKind::Bounciness).unwrap();
        }
        assert_eq!(stats.bounciness, 0.9);
        assert_eq!(
            buy(&mut stats, UpgradeKind::Bounciness),
            Err(PurchaseError::Maxed(UpgradeKind::Bounciness))
        );
        assert_eq!(stats.money, 10_000 - 6 * BOUNCE_PRICE);
    }

    #[test]
    fn test_aerodynamics_flat_price_and_cap() {
        let mut stats = UpgradeStats {
            money: 10_000,
            ..Default::default()
        };
        for _ in 0..10 {
            assert_eq!(buy(&mut stats, UpgradeKind::Aerodynamics), Ok(AERO_PRICE));
        }
        assert_eq!(stats.aerodynamics, 5.0);
        assert!(!can_buy(UpgradeKind::Aerodynamics, &stats));
    }

    #[test]
    fn test_error_messages() {
        let err = PurchaseError::InsufficientFunds { price: 200, balance: 5 };
        assert_eq!(err.to_string(), "need 200 coins, have 5");
        assert_eq!(PurchaseError::Maxed(UpgradeKind::Power).to_string(), "power is already maxed");
    }
}
