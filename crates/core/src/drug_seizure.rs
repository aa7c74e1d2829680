//! Drug-seizure forms: kinds, quantity rules, registry numbering scopes and
//! report assembly.
//!
//! Eight seizure kinds exist. The `env_*` kinds count wrappers
//! (envoltorios); the `kg_*` kinds weigh the seizure in kilograms.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// How a seizure kind is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Units,
    Kilograms,
}

/// One seizure form family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeizureKind {
    EnvPbc,
    EnvCc,
    EnvMarihuana,
    KgPbc,
    KgCc,
    KgMarihuana,
    KgLatexOpio,
    KgDrogaSintetica,
}

impl SeizureKind {
    pub const ALL: [SeizureKind; 8] = [
        Self::EnvPbc,
        Self::EnvCc,
        Self::EnvMarihuana,
        Self::KgPbc,
        Self::KgCc,
        Self::KgMarihuana,
        Self::KgLatexOpio,
        Self::KgDrogaSintetica,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnvPbc => "env_pbc",
            Self::EnvCc => "env_cc",
            Self::EnvMarihuana => "env_marihuana",
            Self::KgPbc => "kg_pbc",
            Self::KgCc => "kg_cc",
            Self::KgMarihuana => "kg_marihuana",
            Self::KgLatexOpio => "kg_latex_opio",
            Self::KgDrogaSintetica => "kg_droga_sintetica",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == raw)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid seizure kind '{raw}'. Must be one of: {:?}",
                    Self::ALL.map(Self::as_str)
                ))
            })
    }

    pub fn measure(self) -> Measure {
        match self {
            Self::EnvPbc | Self::EnvCc | Self::EnvMarihuana => Measure::Units,
            _ => Measure::Kilograms,
        }
    }

    /// Registry-counter scope. Each kind numbers its registry independently.
    pub fn registry_scope(self) -> String {
        format!("drug_seizure:{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Intervention types
// ---------------------------------------------------------------------------

pub const INTERVENTION_OPERATION: &str = "OPERATIVO";
pub const INTERVENTION_INTERVENTION: &str = "INTERVENCION";

pub const VALID_INTERVENTIONS: &[&str] = &[INTERVENTION_OPERATION, INTERVENTION_INTERVENTION];

/// Normalize an intervention type. Accepts any case and the accented
/// spelling `INTERVENCIÓN`.
pub fn normalize_intervention(raw: &str) -> Result<&'static str, CoreError> {
    let upper = raw.trim().to_uppercase().replace('Ó', "O");
    VALID_INTERVENTIONS
        .iter()
        .copied()
        .find(|v| *v == upper)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "intervention_type: must be one of {VALID_INTERVENTIONS:?}, got '{raw}'"
            ))
        })
}

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

/// Check that exactly the quantity matching the kind's measure is present
/// and positive.
pub fn validate_quantity(
    kind: SeizureKind,
    units: Option<i32>,
    kilograms: Option<f64>,
) -> Result<(), CoreError> {
    match kind.measure() {
        Measure::Units => {
            if kilograms.is_some() {
                return Err(CoreError::Validation(format!(
                    "quantity_kg: not allowed for {}",
                    kind.as_str()
                )));
            }
            match units {
                Some(n) if n > 0 => Ok(()),
                _ => Err(CoreError::Validation(
                    "quantity_units: must be greater than zero".into(),
                )),
            }
        }
        Measure::Kilograms => {
            if units.is_some() {
                return Err(CoreError::Validation(format!(
                    "quantity_units: not allowed for {}",
                    kind.as_str()
                )));
            }
            match kilograms {
                Some(kg) if kg.is_finite() && kg > 0.0 => Ok(()),
                _ => Err(CoreError::Validation(
                    "quantity_kg: must be greater than zero".into(),
                )),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary report
// ---------------------------------------------------------------------------

/// Per-kind aggregate as read from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct KindTotals {
    pub kind: String,
    pub operations: i64,
    pub total_quantity: f64,
}

/// Statistics for one seizure kind in the summary report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindStats {
    pub measure: Measure,
    pub operations: i64,
    pub total_quantity: f64,
    pub average: f64,
}

/// Filters echoed back in the summary report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppliedFilters {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub department_id: Option<DbId>,
}

/// Consolidated seizure statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeizureSummary {
    pub total_records: i64,
    pub by_intervention_type: BTreeMap<String, i64>,
    pub by_kind: BTreeMap<&'static str, KindStats>,
    pub filters: AppliedFilters,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assemble the summary report. Every kind and intervention type appears,
/// with zeros when no rows matched.
pub fn build_summary(
    kind_totals: &[KindTotals],
    intervention_counts: &[(String, i64)],
    filters: AppliedFilters,
) -> SeizureSummary {
    let by_kind = SeizureKind::ALL
        .into_iter()
        .map(|kind| {
            let (operations, total) = kind_totals
                .iter()
                .find(|t| t.kind == kind.as_str())
                .map(|t| (t.operations, t.total_quantity))
                .unwrap_or((0, 0.0));
            let average = if operations > 0 {
                round2(total / operations as f64)
            } else {
                0.0
            };
            (
                kind.as_str(),
                KindStats {
                    measure: kind.measure(),
                    operations,
                    total_quantity: round2(total),
                    average,
                },
            )
        })
        .collect();

    let mut by_intervention_type: BTreeMap<String, i64> = VALID_INTERVENTIONS
        .iter()
        .map(|v| (v.to_string(), 0))
        .collect();
    for (name, count) in intervention_counts {
        *by_intervention_type.entry(name.clone()).or_insert(0) += count;
    }

    SeizureSummary {
        total_records: kind_totals.iter().map(|t| t.operations).sum(),
        by_intervention_type,
        by_kind,
        filters,
    }
}

// ---------------------------------------------------------------------------
// Ranking report
// ---------------------------------------------------------------------------

pub const DEFAULT_RANKING_LIMIT: i64 = 10;
pub const MAX_RANKING_LIMIT: i64 = 100;

/// What the ranking groups seizures by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingDimension {
    /// Department where the seizure happened.
    Department,
    /// Police directorate that made the seizure.
    Unit,
}

impl RankingDimension {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("department") => Ok(Self::Department),
            Some("unit") => Ok(Self::Unit),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid ranking dimension '{other}'. Must be one of: [\"department\", \"unit\"]"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Unit => "unit",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_and_split_by_measure() {
        for kind in SeizureKind::ALL {
            assert_eq!(SeizureKind::parse(kind.as_str()).unwrap(), kind);
            let expected = if kind.as_str().starts_with("env_") {
                Measure::Units
            } else {
                Measure::Kilograms
            };
            assert_eq!(kind.measure(), expected);
        }
        assert!(SeizureKind::parse("kg_cafe").is_err());
    }

    #[test]
    fn registry_scopes_are_distinct_per_kind() {
        assert_eq!(SeizureKind::KgPbc.registry_scope(), "drug_seizure:kg_pbc");
        assert_ne!(
            SeizureKind::EnvPbc.registry_scope(),
            SeizureKind::KgPbc.registry_scope()
        );
    }

    #[test]
    fn intervention_accepts_accent_and_case() {
        assert_eq!(normalize_intervention("Intervención").unwrap(), "INTERVENCION");
        assert_eq!(normalize_intervention(" operativo ").unwrap(), "OPERATIVO");
        assert!(normalize_intervention("PATRULLAJE").is_err());
    }

    #[test]
    fn wrapper_kinds_need_positive_units() {
        assert!(validate_quantity(SeizureKind::EnvCc, Some(12), None).is_ok());
        assert!(validate_quantity(SeizureKind::EnvCc, Some(0), None).is_err());
        assert!(validate_quantity(SeizureKind::EnvCc, None, None).is_err());
        assert!(validate_quantity(SeizureKind::EnvCc, Some(3), Some(1.0)).is_err());
    }

    #[test]
    fn kilogram_kinds_need_positive_weight() {
        assert!(validate_quantity(SeizureKind::KgLatexOpio, None, Some(0.125)).is_ok());
        assert!(validate_quantity(SeizureKind::KgLatexOpio, None, Some(-1.0)).is_err());
        assert!(validate_quantity(SeizureKind::KgLatexOpio, None, Some(f64::NAN)).is_err());
        assert!(validate_quantity(SeizureKind::KgLatexOpio, Some(1), Some(1.0)).is_err());
    }

    #[test]
    fn summary_fills_missing_kinds_with_zeros() {
        let totals = vec![
            KindTotals { kind: "env_pbc".into(), operations: 3, total_quantity: 100.0 },
            KindTotals { kind: "kg_cc".into(), operations: 2, total_quantity: 1.5 },
        ];
        let interventions = vec![("OPERATIVO".to_string(), 5)];
        let summary = build_summary(&totals, &interventions, AppliedFilters::default());

        assert_eq!(summary.total_records, 5);
        assert_eq!(summary.by_kind.len(), 8);
        assert_eq!(summary.by_kind["env_pbc"].average, 33.33);
        assert_eq!(summary.by_kind["kg_cc"].average, 0.75);
        assert_eq!(summary.by_kind["kg_marihuana"].operations, 0);
        assert_eq!(summary.by_kind["kg_marihuana"].average, 0.0);
        assert_eq!(summary.by_intervention_type["OPERATIVO"], 5);
        assert_eq!(summary.by_intervention_type["INTERVENCION"], 0);
    }

    #[test]
    fn ranking_dimension_defaults_to_department() {
        assert_eq!(RankingDimension::parse(None).unwrap(), RankingDimension::Department);
        assert_eq!(RankingDimension::parse(Some("unit")).unwrap(), RankingDimension::Unit);
        assert!(RankingDimension::parse(Some("province")).is_err());
    }
}
