//! Static marketing data: the services offered and the pricing plans.

use rust_decimal::Decimal;
use serde::Serialize;

/// Lawn size covered by the base visit price
pub const INCLUDED_SQFT: i32 = 5_000;
/// Size of each billable step above the included area
pub const SQFT_STEP: i32 = 1_000;
/// Largest lawn the estimator prices online
pub const MAX_ESTIMATE_SQFT: i32 = 200_000;

/// A service shown on the services page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub slug: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub features: &'static [&'static str],
    /// Price of one visit for a lawn up to `INCLUDED_SQFT`
    pub base_visit_price: Decimal,
    /// Added per started `SQFT_STEP` above the included area
    pub price_per_extra_step: Decimal,
}

/// A plan shown on the pricing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub slug: &'static str,
    pub name: &'static str,
    pub monthly_price: Decimal,
    pub visits_per_month: u32,
    pub cadence: &'static str,
    pub features: &'static [&'static str],
    pub highlighted: bool,
}

impl PricingPlan {
    /// Effective per-visit price of the plan
    pub fn per_visit_price(&self) -> Decimal {
        (self.monthly_price / Decimal::from(self.visits_per_month)).round_dp(2)
    }
}

/// All services, in display order
pub fn services() -> Vec<ServiceOffering> {
    vec![
        ServiceOffering {
            slug: "mowing",
            name: "Lawn Mowing",
            summary: "Precision mowing, string trimming and edging with clippings blown clean.",
            features: &["Mowing at seasonal height", "Edging along walks and drives", "Blow-off of hard surfaces"],
            base_visit_price: Decimal::new(4500, 2),
            price_per_extra_step: Decimal::new(500, 2),
        },
        ServiceOffering {
            slug: "fertilization",
            name: "Fertilization & Weed Control",
            summary: "Seasonal fertilizer blends with targeted pre- and post-emergent weed control.",
            features: &["Soil-appropriate blends", "Spot weed treatment", "Service notes after every visit"],
            base_visit_price: Decimal::new(6500, 2),
            price_per_extra_step: Decimal::new(800, 2),
        },
        ServiceOffering {
            slug: "aeration",
            name: "Core Aeration & Overseeding",
            summary: "Relieve compaction and thicken thin turf ahead of the growing season.",
            features: &["Core aeration", "Premium seed blend", "Starter fertilizer"],
            base_visit_price: Decimal::new(12000, 2),
            price_per_extra_step: Decimal::new(1500, 2),
        },
        ServiceOffering {
            slug: "cleanup",
            name: "Seasonal Cleanup",
            summary: "Leaf removal, bed cleanup and debris haul-away in spring and fall.",
            features: &["Leaf removal", "Bed cleanup", "Haul-away included"],
            base_visit_price: Decimal::new(15000, 2),
            price_per_extra_step: Decimal::new(2000, 2),
        },
    ]
}

/// All pricing plans, in display order
pub fn pricing_plans() -> Vec<PricingPlan> {
    vec![
        PricingPlan {
            slug: "basic",
            name: "Basic",
            monthly_price: Decimal::new(9900, 2),
            visits_per_month: 2,
            cadence: "biweekly",
            features: &["Biweekly mowing", "Edging and trimming"],
            highlighted: false,
        },
        PricingPlan {
            slug: "standard",
            name: "Standard",
            monthly_price: Decimal::new(16900, 2),
            visits_per_month: 4,
            cadence: "weekly",
            features: &["Weekly mowing", "Edging and trimming", "Quarterly fertilization"],
            highlighted: true,
        },
        PricingPlan {
            slug: "premium",
            name: "Premium",
            monthly_price: Decimal::new(24900, 2),
            visits_per_month: 4,
            cadence: "weekly",
            features: &[
                "Weekly mowing",
                "Edging and trimming",
                "Monthly fertilization & weed control",
                "Annual aeration",
            ],
            highlighted: false,
        },
    ]
}

/// Find a service by slug
pub fn find_service(slug: &str) -> Option<ServiceOffering> {
    services().into_iter().find(|s| s.slug == slug)
}

/// Estimate one visit of `service` for a lawn of `lawn_size_sqft`.
///
/// Lawns up to `INCLUDED_SQFT` pay the base price; every started
/// `SQFT_STEP` above that adds `price_per_extra_step`. Sizes outside
/// `1..=MAX_ESTIMATE_SQFT` get no online estimate.
pub fn estimate_visit_price(service: &ServiceOffering, lawn_size_sqft: i32) -> Option<Decimal> {
    if lawn_size_sqft <= 0 || lawn_size_sqft > MAX_ESTIMATE_SQFT {
        return None;
    }

    let extra = (lawn_size_sqft - INCLUDED_SQFT).max(0);
    let steps = (extra + SQFT_STEP - 1) / SQFT_STEP;

    Some(service.base_visit_price + service.price_per_extra_step * Decimal::from(steps))
}
