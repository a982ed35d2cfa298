//! Candidate ranking
//!
//! Each penalty is a linear ratio in `[0, 1]` scaled by a coefficient; a
//! lower penalty means a more attractive candidate. How penalties combine
//! is up to the [`Scorer`]. [`WeightedPenalty`] simply sums them.

use chrono::Duration;
use helios_core::{Path, Price, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn clamp_unit(ratio: Decimal) -> Decimal {
    ratio.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Distance of a strike from the underlying, relative to the widest
/// distance observed in the set
pub fn strike_penalty(
    strike: Price,
    underlying: Price,
    max_distance: Price,
    coeff: Decimal,
) -> Decimal {
    if max_distance.is_zero() {
        return Decimal::ZERO;
    }
    clamp_unit((strike - underlying).abs() / max_distance.abs()) * coeff
}

/// Time left until expiration, relative to a lookahead window
///
/// Zero on or after the day before expiration.
pub fn expiration_penalty(
    expiration: Timestamp,
    now: Timestamp,
    lookahead: Duration,
    coeff: Decimal,
) -> Decimal {
    if now >= expiration - Duration::days(1) {
        return Decimal::ZERO;
    }
    let window = lookahead.num_milliseconds();
    if window <= 0 {
        return coeff;
    }
    let remaining = (expiration - now).num_milliseconds();
    clamp_unit(Decimal::from(remaining) / Decimal::from(window)) * coeff
}

/// Position of a premium between the cheapest and most expensive observed
pub fn premium_penalty(
    premium: Price,
    cheapest: Price,
    most_expensive: Price,
    coeff: Decimal,
) -> Decimal {
    let spread = most_expensive - cheapest;
    if spread <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    clamp_unit((premium - cheapest) / spread) * coeff
}

/// Observations over a candidate set that penalties are relative to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingContext {
    pub now: Timestamp,
    /// Widest |strike - price| among option paths
    pub max_strike_distance: Price,
    pub cheapest_premium: Option<Price>,
    pub most_expensive_premium: Option<Price>,
}

impl RankingContext {
    pub fn observe<'a, I>(paths: I, now: Timestamp) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut ctx = Self {
            now,
            max_strike_distance: Decimal::ZERO,
            cheapest_premium: None,
            most_expensive_premium: None,
        };
        for path in paths {
            if let Some(strike) = path.strike {
                ctx.max_strike_distance = ctx.max_strike_distance.max((strike - path.price).abs());
            }
            if let Some(premium) = path.premium {
                ctx.cheapest_premium = Some(ctx.cheapest_premium.map_or(premium, |p| p.min(premium)));
                ctx.most_expensive_premium =
                    Some(ctx.most_expensive_premium.map_or(premium, |p| p.max(premium)));
            }
        }
        ctx
    }
}

/// Scores a candidate; lower is better
pub trait Scorer: Send + Sync {
    fn score(&self, path: &Path, ctx: &RankingContext) -> Decimal;
}

/// Sum of the three penalties, each with its own weight
///
/// Plain (non-option) paths carry no metadata and score zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPenalty {
    pub strike: Decimal,
    pub expiration: Decimal,
    pub premium: Decimal,
    pub lookahead: Duration,
}

impl Default for WeightedPenalty {
    fn default() -> Self {
        Self {
            strike: dec!(1),
            expiration: dec!(1),
            premium: dec!(1),
            lookahead: Duration::days(30),
        }
    }
}

impl Scorer for WeightedPenalty {
    fn score(&self, path: &Path, ctx: &RankingContext) -> Decimal {
        let mut total = Decimal::ZERO;
        if let Some(strike) = path.strike {
            total += strike_penalty(strike, path.price, ctx.max_strike_distance, self.strike);
        }
        if let Some(expiration) = path.expiration {
            total += expiration_penalty(expiration, ctx.now, self.lookahead, self.expiration);
        }
        if let (Some(premium), Some(cheapest), Some(dearest)) =
            (path.premium, ctx.cheapest_premium, ctx.most_expensive_premium)
        {
            total += premium_penalty(premium, cheapest, dearest, self.premium);
        }
        total
    }
}

/// Paths ordered best first; ties keep their input order
pub fn rank<'a, S>(
    paths: &'a [Path],
    scorer: &S,
    ctx: &RankingContext,
) -> Vec<(&'a Path, Decimal)>
where
    S: Scorer + ?Sized,
{
    let mut scored: Vec<_> = paths.iter().map(|p| (p, scorer.score(p, ctx))).collect();
    scored.sort_by(|a, b| a.1.cmp(&b.1));
    scored
}
