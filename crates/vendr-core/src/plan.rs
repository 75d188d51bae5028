//! # Plan Registry
//!
//! Named subscription tiers with numeric limits and feature flags.
//!
//! ## What Plans Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Plan Registry                                │
//! │                                                                     │
//! │  limits.products  ──► checked on product creation                   │
//! │  limits.customers ──► checked on customer creation                  │
//! │  features.*       ──► gate receipt/invoice rendering & support      │
//! │                       tier display in the (excluded) UI layer       │
//! │                                                                     │
//! │  Plans NEVER affect quote/sale math. The engine does not consult    │
//! │  the registry.                                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tier set is closed: `gratis`, `basico`, `elite`. Admins may re-tune
//! a tier's numbers but cannot invent new tiers.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Plan Identity
// =============================================================================

/// The closed, fixed set of tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Gratis,
    Basico,
    Elite,
}

impl PlanId {
    /// All tiers, in ascending order.
    pub const ALL: [PlanId; 3] = [PlanId::Gratis, PlanId::Basico, PlanId::Elite];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Gratis => "gratis",
            PlanId::Basico => "basico",
            PlanId::Elite => "elite",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gratis" => Ok(PlanId::Gratis),
            "basico" => Ok(PlanId::Basico),
            "elite" => Ok(PlanId::Elite),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Plan Shape
// =============================================================================

/// Support level shown to the user; display-only, never math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportTier {
    None,
    Limited,
    Full,
}

/// Numeric caps per tier. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub products: Option<u32>,
    pub customers: Option<u32>,
}

impl PlanLimits {
    /// Whether `current` owned records leave room for one more under the
    /// given cap.
    pub fn allows(cap: Option<u32>, current: usize) -> bool {
        match cap {
            None => true,
            Some(limit) => current < limit as usize,
        }
    }
}

/// Boolean feature flags per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    pub coupon: bool,
    pub nota: bool,
    pub support: SupportTier,
}

/// A named tier: pricing, limits, flags, promo copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub monthly_price: Money,
    pub annual_price: Money,
    pub limits: PlanLimits,
    pub features: PlanFeatures,
    pub promo: String,
}

// =============================================================================
// Partial Updates
// =============================================================================

/// Admin patch for a tier. Absent fields keep their current value.
///
/// Limits use a double Option: outer `None` = keep, `Some(None)` = set
/// unbounded, `Some(Some(n))` = set cap. This preserves the original API's
/// distinction between "field omitted" and "field explicitly null".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPatch {
    pub name: Option<String>,
    pub monthly_price: Option<Money>,
    pub annual_price: Option<Money>,
    pub limits: Option<LimitsPatch>,
    pub features: Option<FeaturesPatch>,
    pub promo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsPatch {
    #[serde(default, deserialize_with = "present_field")]
    pub products: Option<Option<u32>>,
    #[serde(default, deserialize_with = "present_field")]
    pub customers: Option<Option<u32>>,
}

/// Deserializes a field that is present in the payload, keeping `null`
/// distinguishable from an absent field (absent hits `#[serde(default)]`
/// instead and stays outer-`None`). Shared by every patch type that needs
/// "explicit null clears the value" semantics.
pub fn present_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesPatch {
    pub coupon: Option<bool>,
    pub nota: Option<bool>,
    pub support: Option<SupportTier>,
}

// =============================================================================
// Registry
// =============================================================================

/// One slot per tier. The closed `PlanId` enum maps straight onto fields,
/// so lookups are infallible by construction.
#[derive(Debug)]
struct PlanTable {
    gratis: Plan,
    basico: Plan,
    elite: Plan,
}

impl PlanTable {
    fn plan(&self, id: PlanId) -> &Plan {
        match id {
            PlanId::Gratis => &self.gratis,
            PlanId::Basico => &self.basico,
            PlanId::Elite => &self.elite,
        }
    }

    fn plan_mut(&mut self, id: PlanId) -> &mut Plan {
        match id {
            PlanId::Gratis => &mut self.gratis,
            PlanId::Basico => &mut self.basico,
            PlanId::Elite => &mut self.elite,
        }
    }
}

/// In-process registry of the three tiers.
///
/// Interior `RwLock` because catalog/customer writes read it concurrently
/// while an admin may re-tune a tier. A poisoned lock is recovered: every
/// writer replaces whole fields, so the guarded data stays consistent even
/// if a writer panicked mid-merge.
#[derive(Debug)]
pub struct PlanRegistry {
    plans: RwLock<PlanTable>,
}

impl PlanRegistry {
    /// Creates a registry seeded with the default tier table.
    pub fn with_defaults() -> Self {
        let plans = PlanTable {
            gratis: Plan {
                id: PlanId::Gratis,
                name: "Grátis".into(),
                monthly_price: Money::new(dec!(0)),
                annual_price: Money::new(dec!(0)),
                limits: PlanLimits {
                    products: Some(80),
                    customers: Some(80),
                },
                features: PlanFeatures {
                    coupon: false,
                    nota: false,
                    support: SupportTier::None,
                },
                promo: String::new(),
            },
            basico: Plan {
                id: PlanId::Basico,
                name: "Básico".into(),
                monthly_price: Money::new(dec!(49.90)),
                annual_price: Money::new(dec!(499)),
                limits: PlanLimits {
                    products: Some(200),
                    customers: Some(200),
                },
                features: PlanFeatures {
                    coupon: true,
                    nota: true,
                    support: SupportTier::Limited,
                },
                promo: String::new(),
            },
            elite: Plan {
                id: PlanId::Elite,
                name: "Elite".into(),
                monthly_price: Money::new(dec!(99.90)),
                annual_price: Money::new(dec!(999)),
                limits: PlanLimits {
                    products: None,
                    customers: None,
                },
                features: PlanFeatures {
                    coupon: true,
                    nota: true,
                    support: SupportTier::Full,
                },
                promo: String::new(),
            },
        };

        PlanRegistry {
            plans: RwLock::new(plans),
        }
    }

    /// Looks up a tier. The id set is closed and every id has a slot, so
    /// lookup cannot fail.
    pub fn get(&self, id: PlanId) -> Plan {
        self.plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .plan(id)
            .clone()
    }

    /// All tiers in ascending order (dashboard/pricing-page view).
    pub fn all(&self) -> Vec<Plan> {
        let guard = self.plans.read().unwrap_or_else(PoisonError::into_inner);
        PlanId::ALL.iter().map(|id| guard.plan(*id).clone()).collect()
    }

    /// Applies a partial update to a tier and returns the merged result.
    pub fn update(&self, id: PlanId, patch: PlanPatch) -> Plan {
        let mut guard = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        let plan = guard.plan_mut(id);

        if let Some(name) = patch.name {
            plan.name = name;
        }
        if let Some(monthly) = patch.monthly_price {
            plan.monthly_price = monthly;
        }
        if let Some(annual) = patch.annual_price {
            plan.annual_price = annual;
        }
        if let Some(limits) = patch.limits {
            if let Some(products) = limits.products {
                plan.limits.products = products;
            }
            if let Some(customers) = limits.customers {
                plan.limits.customers = customers;
            }
        }
        if let Some(features) = patch.features {
            if let Some(coupon) = features.coupon {
                plan.features.coupon = coupon;
            }
            if let Some(nota) = features.nota {
                plan.features.nota = nota;
            }
            if let Some(support) = features.support {
                plan.features.support = support;
            }
        }
        if let Some(promo) = patch.promo {
            plan.promo = promo;
        }

        plan.clone()
    }
}

impl Default for PlanRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let registry = PlanRegistry::with_defaults();

        let gratis = registry.get(PlanId::Gratis);
        assert_eq!(gratis.limits.products, Some(80));
        assert!(!gratis.features.coupon);

        let elite = registry.get(PlanId::Elite);
        assert_eq!(elite.limits.products, None);
        assert_eq!(elite.features.support, SupportTier::Full);
    }

    #[test]
    fn test_all_lists_every_tier_in_order() {
        let registry = PlanRegistry::with_defaults();
        let ids: Vec<PlanId> = registry.all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, PlanId::ALL);
    }

    #[test]
    fn test_plan_id_round_trip() {
        for id in PlanId::ALL {
            assert_eq!(id.as_str().parse::<PlanId>().unwrap(), id);
        }
        assert!("premium".parse::<PlanId>().is_err());
    }

    #[test]
    fn test_limit_allows() {
        assert!(PlanLimits::allows(None, 1_000_000));
        assert!(PlanLimits::allows(Some(80), 79));
        assert!(!PlanLimits::allows(Some(80), 80));
        assert!(!PlanLimits::allows(Some(80), 81));
    }

    #[test]
    fn test_patch_merges_partially() {
        let registry = PlanRegistry::with_defaults();

        let updated = registry.update(
            PlanId::Basico,
            PlanPatch {
                name: Some("Básico+".into()),
                limits: Some(LimitsPatch {
                    products: Some(Some(500)),
                    customers: None, // omitted: keep 200
                }),
                ..Default::default()
            },
        );

        assert_eq!(updated.name, "Básico+");
        assert_eq!(updated.limits.products, Some(500));
        assert_eq!(updated.limits.customers, Some(200));
        // untouched fields survive
        assert!(updated.features.nota);
    }

    #[test]
    fn test_patch_explicit_null_means_unbounded() {
        let registry = PlanRegistry::with_defaults();

        let updated = registry.update(
            PlanId::Gratis,
            PlanPatch {
                limits: Some(LimitsPatch {
                    products: Some(None), // explicit null: lift the cap
                    customers: None,
                }),
                ..Default::default()
            },
        );

        assert_eq!(updated.limits.products, None);
        assert_eq!(updated.limits.customers, Some(80));
    }

    #[test]
    fn test_patch_deserializes_from_admin_payload() {
        let patch: PlanPatch = serde_json::from_str(
            r#"{"monthlyPrice": 59.9, "limits": {"products": null}, "features": {"support": "full"}}"#,
        )
        .unwrap();

        let registry = PlanRegistry::with_defaults();
        let updated = registry.update(PlanId::Basico, patch);
        assert_eq!(updated.monthly_price, Money::new(rust_decimal_macros::dec!(59.9)));
        assert_eq!(updated.limits.products, None);
        assert_eq!(updated.features.support, SupportTier::Full);
    }
}
