//! Cascading consistency checks for multi-level reference selections.
//!
//! A form may submit several levels of one chain at once (department,
//! province and district, say). Each submitted level must sit under the
//! nearest submitted level above it. The database layer loads each selected
//! row's stored ancestors; [`check_chain`] compares them with what was
//! submitted, outer level first.

use crate::error::CoreError;
use crate::reference::ReferenceKind;
use crate::types::DbId;

/// One level of a chain: which table it lives in and which payload field
/// carries the selected id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub kind: ReferenceKind,
    pub field: &'static str,
}

/// An ordered parent-to-child chain of reference tables.
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    pub name: &'static str,
    pub levels: &'static [Level],
}

pub const LOCATION_CHAIN: Chain = Chain {
    name: "location",
    levels: &[
        Level { kind: ReferenceKind::Departments, field: "department_id" },
        Level { kind: ReferenceKind::Provinces, field: "province_id" },
        Level { kind: ReferenceKind::Districts, field: "district_id" },
    ],
};

pub const CRIME_CHAIN: Chain = Chain {
    name: "crime",
    levels: &[
        Level { kind: ReferenceKind::CrimeJurisdictions, field: "crime_jurisdiction_id" },
        Level { kind: ReferenceKind::CrimeGenerals, field: "crime_general_id" },
        Level { kind: ReferenceKind::CrimeSpecifics, field: "crime_specific_id" },
        Level { kind: ReferenceKind::CrimeSubtypes, field: "crime_subtype_id" },
    ],
};

pub const POLICE_CHAIN: Chain = Chain {
    name: "police",
    levels: &[
        Level { kind: ReferenceKind::PoliceDirectorates, field: "directorate_id" },
        Level { kind: ReferenceKind::SpecializedDirectorates, field: "specialized_directorate_id" },
    ],
};

pub const WEAPON_CHAIN: Chain = Chain {
    name: "weapon",
    levels: &[
        Level { kind: ReferenceKind::WeaponCategories, field: "weapon_category_id" },
        Level { kind: ReferenceKind::WeaponTypes, field: "weapon_type_id" },
    ],
};

/// A submitted level after its stored ancestry has been loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedLevel {
    /// The id submitted for this level, if any.
    pub submitted: Option<DbId>,
    /// Stored ancestor ids of the submitted row, ordered from the chain root
    /// down to the immediate parent. Length equals the level's depth.
    pub ancestors: Vec<DbId>,
}

impl ResolvedLevel {
    pub fn unselected() -> Self {
        Self::default()
    }

    pub fn selected(id: DbId, ancestors: Vec<DbId>) -> Self {
        Self {
            submitted: Some(id),
            ancestors,
        }
    }
}

/// Error for a submitted id that does not exist in its table.
pub fn unknown_selection(level: &Level, id: DbId) -> CoreError {
    CoreError::Validation(format!(
        "{}: {} {id} does not exist",
        level.field,
        level.kind.label()
    ))
}

/// Verify that every submitted level belongs to the nearest submitted level
/// above it. Reports the first inconsistent level, outer to inner.
pub fn check_chain(chain: &Chain, resolved: &[ResolvedLevel]) -> Result<(), CoreError> {
    if resolved.len() != chain.levels.len() {
        return Err(CoreError::Internal(format!(
            "{} chain expects {} levels, got {}",
            chain.name,
            chain.levels.len(),
            resolved.len()
        )));
    }

    let mut enclosing: Option<(usize, DbId)> = None;
    for (depth, (level, selection)) in chain.levels.iter().zip(resolved).enumerate() {
        let Some(id) = selection.submitted else {
            continue;
        };
        if selection.ancestors.len() != depth {
            return Err(CoreError::Internal(format!(
                "{}: expected {depth} stored ancestors, got {}",
                level.field,
                selection.ancestors.len()
            )));
        }
        if let Some((outer_depth, outer_id)) = enclosing {
            if selection.ancestors[outer_depth] != outer_id {
                let outer = &chain.levels[outer_depth];
                return Err(CoreError::Validation(format!(
                    "{}: the selected {} does not belong to the selected {}",
                    level.field,
                    level.kind.label(),
                    outer.kind.label()
                )));
            }
        }
        enclosing = Some((depth, id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn chains_follow_reference_parents() {
        for chain in [LOCATION_CHAIN, CRIME_CHAIN, POLICE_CHAIN, WEAPON_CHAIN] {
            assert!(chain.levels[0].kind.parent().is_none());
            for pair in chain.levels.windows(2) {
                assert_eq!(pair[1].kind.parent(), Some(pair[0].kind), "{}", chain.name);
            }
        }
    }

    #[test]
    fn consistent_full_selection_passes() {
        // department 1 > province 10 > district 100
        let resolved = [
            ResolvedLevel::selected(1, vec![]),
            ResolvedLevel::selected(10, vec![1]),
            ResolvedLevel::selected(100, vec![1, 10]),
        ];
        assert!(check_chain(&LOCATION_CHAIN, &resolved).is_ok());
    }

    #[test]
    fn province_from_other_department_is_reported_first() {
        // Province 20 belongs to department 2 while department 1 was
        // submitted; district 200 is also inconsistent but comes later.
        let resolved = [
            ResolvedLevel::selected(1, vec![]),
            ResolvedLevel::selected(20, vec![2]),
            ResolvedLevel::selected(200, vec![2, 21]),
        ];
        let err = check_chain(&LOCATION_CHAIN, &resolved).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("province_id:"));
    }

    #[test]
    fn district_from_other_province_is_reported() {
        let resolved = [
            ResolvedLevel::selected(1, vec![]),
            ResolvedLevel::selected(10, vec![1]),
            ResolvedLevel::selected(110, vec![1, 11]),
        ];
        let err = check_chain(&LOCATION_CHAIN, &resolved).unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(msg)
                if msg == "district_id: the selected district does not belong to the selected province"
        );
    }

    #[test]
    fn skipped_level_compares_against_nearest_submitted_ancestor() {
        // Department submitted, province omitted, district under department 2.
        let resolved = [
            ResolvedLevel::selected(1, vec![]),
            ResolvedLevel::unselected(),
            ResolvedLevel::selected(200, vec![2, 20]),
        ];
        let err = check_chain(&LOCATION_CHAIN, &resolved).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("selected department"));
    }

    #[test]
    fn leaf_only_selection_passes() {
        let resolved = [
            ResolvedLevel::unselected(),
            ResolvedLevel::unselected(),
            ResolvedLevel::unselected(),
            ResolvedLevel::selected(7, vec![1, 2, 3]),
        ];
        assert!(check_chain(&CRIME_CHAIN, &resolved).is_ok());
    }

    #[test]
    fn crime_chain_mismatch_names_specific_level() {
        let resolved = [
            ResolvedLevel::selected(1, vec![]),
            ResolvedLevel::selected(2, vec![1]),
            ResolvedLevel::selected(3, vec![1, 9]),
            ResolvedLevel::selected(4, vec![1, 9, 3]),
        ];
        let err = check_chain(&CRIME_CHAIN, &resolved).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("crime_specific_id:"));
    }

    #[test]
    fn wrong_level_count_is_internal_error() {
        let err = check_chain(&POLICE_CHAIN, &[ResolvedLevel::unselected()]).unwrap_err();
        assert_matches!(err, CoreError::Internal(_));
    }

    #[test]
    fn unknown_selection_names_field() {
        let err = unknown_selection(&LOCATION_CHAIN.levels[2], 99);
        assert_matches!(err, CoreError::Validation(msg) if msg == "district_id: district 99 does not exist");
    }
}
