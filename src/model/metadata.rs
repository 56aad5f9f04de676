use std::fmt;

// ---------------------------------------------------------------------------
// Unit – what a domain's predictions are measured in
// ---------------------------------------------------------------------------

/// Output unit of a prediction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Tons,
    OuncesGold,
    OuncesSilver,
    /// Unknown domain: no unit is shown.
    None,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::Tons => "tons",
            Unit::OuncesGold => "oz Au",
            Unit::OuncesSilver => "oz Ag",
            Unit::None => "",
        }
    }

    /// Percentage outputs are scaled ×100 and clamped at 100.
    pub fn is_percent(&self) -> bool {
        matches!(self, Unit::Percent)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Domain – the prediction target a model file belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Recovery,
    Tonnage,
    Gold,
    Silver,
    Unknown,
}

impl Domain {
    /// Title-cased name used in chart titles and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Recovery => "Recovery",
            Domain::Tonnage => "Tonnage",
            Domain::Gold => "Gold",
            Domain::Silver => "Silver",
            Domain::Unknown => "Unknown",
        }
    }

    pub fn metadata(&self) -> &'static DomainMetadata {
        match self {
            Domain::Recovery => &RECOVERY,
            Domain::Tonnage => &TONNAGE,
            Domain::Gold => &GOLD,
            Domain::Silver => &SILVER,
            Domain::Unknown => &UNKNOWN,
        }
    }
}

/// Substring rules, evaluated first-match-wins against the lower-cased
/// file name. Filenames mentioning several domains resolve by this order,
/// so entries must not be reordered.
pub const DOMAIN_RULES: [(&str, Domain); 4] = [
    ("recovery", Domain::Recovery),
    ("tonnage", Domain::Tonnage),
    ("gold", Domain::Gold),
    ("silver", Domain::Silver),
];

// ---------------------------------------------------------------------------
// DomainMetadata – hand-authored schema per domain
// ---------------------------------------------------------------------------

/// Feature names, unit and display colour for one domain.
#[derive(Debug, PartialEq)]
pub struct DomainMetadata {
    /// Sparse zero-based index → feature name.
    pub features: &'static [(usize, &'static str)],
    pub unit: Unit,
    /// `#rrggbb`
    pub color: &'static str,
}

const PLANT_FEATURES: &[(usize, &str)] = &[
    (0, "Head Grade_Au gpt"),
    (1, "Head Grade_Ag gpt"),
    (2, "Tonnage_Processed_tons"),
];

static RECOVERY: DomainMetadata = DomainMetadata {
    features: PLANT_FEATURES,
    unit: Unit::Percent,
    color: "#1f77b4",
};

static TONNAGE: DomainMetadata = DomainMetadata {
    features: &[
        (0, "Off-Vein Meterage"),
        (1, "On-Vein Meterage"),
        (2, "Total_Meterage"),
    ],
    unit: Unit::Tons,
    color: "#2ca02c",
};

static GOLD: DomainMetadata = DomainMetadata {
    features: PLANT_FEATURES,
    unit: Unit::OuncesGold,
    color: "#FFD700",
};

static SILVER: DomainMetadata = DomainMetadata {
    features: PLANT_FEATURES,
    unit: Unit::OuncesSilver,
    color: "#C0C0C0",
};

static UNKNOWN: DomainMetadata = DomainMetadata {
    features: &[],
    unit: Unit::None,
    color: "#000000",
};

impl DomainMetadata {
    /// Name of the feature at zero-based `index`, falling back to the
    /// one-based `Feature N` label when the domain does not author one.
    pub fn feature_name(&self, index: usize) -> String {
        self.features
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| format!("Feature {}", index + 1))
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Determine which domain a model file belongs to.
pub fn domain_of(file_name: &str) -> Domain {
    let name = file_name.to_lowercase();
    DOMAIN_RULES
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, domain)| *domain)
        .unwrap_or(Domain::Unknown)
}

/// Resolve a model file name to its metadata and display label.
/// Never fails: unrecognised names yield the empty metadata and "Unknown".
pub fn resolve(file_name: &str) -> (&'static DomainMetadata, &'static str) {
    let domain = domain_of(file_name);
    (domain.metadata(), domain.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_domain_regardless_of_case_and_position() {
        let cases = [
            ("recovery_tuned.json", Domain::Recovery, Unit::Percent),
            ("XGB_RECOVERY.json", Domain::Recovery, Unit::Percent),
            ("baseline-Tonnage-v2.json", Domain::Tonnage, Unit::Tons),
            ("rf_GoLd.json", Domain::Gold, Unit::OuncesGold),
            ("model_silver_final.json", Domain::Silver, Unit::OuncesSilver),
        ];
        for (name, domain, unit) in cases {
            let (meta, label) = resolve(name);
            assert_eq!(domain_of(name), domain, "{name}");
            assert_eq!(meta.unit, unit, "{name}");
            assert_eq!(label, domain.label());
        }
    }

    #[test]
    fn earlier_rule_wins_when_several_domains_match() {
        assert_eq!(domain_of("gold_silver_ratio.json"), Domain::Gold);
        assert_eq!(domain_of("silver_then_gold.json"), Domain::Gold);
        assert_eq!(domain_of("gold_recovery.json"), Domain::Recovery);
    }

    #[test]
    fn unknown_model_gets_empty_metadata() {
        let (meta, label) = resolve("random_forest.json");
        assert_eq!(label, "Unknown");
        assert!(meta.features.is_empty());
        assert_eq!(meta.unit.as_str(), "");
        assert_eq!(meta.color, "#000000");
    }

    #[test]
    fn feature_names_fall_back_to_one_based_label() {
        let meta = Domain::Tonnage.metadata();
        assert_eq!(meta.feature_name(0), "Off-Vein Meterage");
        assert_eq!(meta.feature_name(2), "Total_Meterage");
        assert_eq!(meta.feature_name(3), "Feature 4");
        assert_eq!(Domain::Unknown.metadata().feature_name(0), "Feature 1");
    }
}
