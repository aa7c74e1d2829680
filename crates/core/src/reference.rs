//! Reference-data catalog: every lookup table the forms select from.
//!
//! All reference tables share one column shape (`id, name, code,
//! description, <parent>_id`), so a single [`ReferenceKind`] enum describes
//! how to reach each of them. The database layer builds its queries from the
//! static table and column names returned here.

use crate::error::CoreError;
use crate::types::DbId;

/// One reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Departments,
    Provinces,
    Districts,
    CrimeJurisdictions,
    CrimeGenerals,
    CrimeSpecifics,
    CrimeSubtypes,
    PoliceDirectorates,
    SpecializedDirectorates,
    PoliceDivisions,
    PoliceDepartments,
    PoliceUnits,
    WeaponCategories,
    WeaponTypes,
    DetaineeStatuses,
    ProsecutorOffices,
    Nationalities,
    DocumentTypes,
    RequisitionTypes,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 19] = [
        Self::Departments,
        Self::Provinces,
        Self::Districts,
        Self::CrimeJurisdictions,
        Self::CrimeGenerals,
        Self::CrimeSpecifics,
        Self::CrimeSubtypes,
        Self::PoliceDirectorates,
        Self::SpecializedDirectorates,
        Self::PoliceDivisions,
        Self::PoliceDepartments,
        Self::PoliceUnits,
        Self::WeaponCategories,
        Self::WeaponTypes,
        Self::DetaineeStatuses,
        Self::ProsecutorOffices,
        Self::Nationalities,
        Self::DocumentTypes,
        Self::RequisitionTypes,
    ];

    /// URL segment under `/reference/`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Provinces => "provinces",
            Self::Districts => "districts",
            Self::CrimeJurisdictions => "crime-jurisdictions",
            Self::CrimeGenerals => "crime-generals",
            Self::CrimeSpecifics => "crime-specifics",
            Self::CrimeSubtypes => "crime-subtypes",
            Self::PoliceDirectorates => "police-directorates",
            Self::SpecializedDirectorates => "specialized-directorates",
            Self::PoliceDivisions => "police-divisions",
            Self::PoliceDepartments => "police-departments",
            Self::PoliceUnits => "police-units",
            Self::WeaponCategories => "weapon-categories",
            Self::WeaponTypes => "weapon-types",
            Self::DetaineeStatuses => "detainee-statuses",
            Self::ProsecutorOffices => "prosecutor-offices",
            Self::Nationalities => "nationalities",
            Self::DocumentTypes => "document-types",
            Self::RequisitionTypes => "requisition-types",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// Database table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Provinces => "provinces",
            Self::Districts => "districts",
            Self::CrimeJurisdictions => "crime_jurisdictions",
            Self::CrimeGenerals => "crime_generals",
            Self::CrimeSpecifics => "crime_specifics",
            Self::CrimeSubtypes => "crime_subtypes",
            Self::PoliceDirectorates => "police_directorates",
            Self::SpecializedDirectorates => "specialized_directorates",
            Self::PoliceDivisions => "police_divisions",
            Self::PoliceDepartments => "police_departments",
            Self::PoliceUnits => "police_units",
            Self::WeaponCategories => "weapon_categories",
            Self::WeaponTypes => "weapon_types",
            Self::DetaineeStatuses => "detainee_statuses",
            Self::ProsecutorOffices => "prosecutor_offices",
            Self::Nationalities => "nationalities",
            Self::DocumentTypes => "document_types",
            Self::RequisitionTypes => "requisition_types",
        }
    }

    /// Foreign-key column pointing at the parent table, if any.
    pub fn parent_column(self) -> Option<&'static str> {
        match self {
            Self::Provinces | Self::ProsecutorOffices => Some("department_id"),
            Self::Districts => Some("province_id"),
            Self::CrimeGenerals => Some("jurisdiction_id"),
            Self::CrimeSpecifics => Some("general_id"),
            Self::CrimeSubtypes => Some("specific_id"),
            Self::SpecializedDirectorates => Some("directorate_id"),
            Self::WeaponTypes => Some("category_id"),
            _ => None,
        }
    }

    /// Parent reference table, if any.
    pub fn parent(self) -> Option<ReferenceKind> {
        match self {
            Self::Provinces | Self::ProsecutorOffices => Some(Self::Departments),
            Self::Districts => Some(Self::Provinces),
            Self::CrimeGenerals => Some(Self::CrimeJurisdictions),
            Self::CrimeSpecifics => Some(Self::CrimeGenerals),
            Self::CrimeSubtypes => Some(Self::CrimeSpecifics),
            Self::SpecializedDirectorates => Some(Self::PoliceDirectorates),
            Self::WeaponTypes => Some(Self::WeaponCategories),
            _ => None,
        }
    }

    /// Named query parameter that filters this kind by parent, as used by
    /// the client's cascading selects (`provinces?departamento_id=`).
    pub fn parent_param(self) -> Option<&'static str> {
        match self {
            Self::Provinces | Self::ProsecutorOffices => Some("departamento_id"),
            Self::Districts => Some("provincia_id"),
            Self::CrimeGenerals => Some("fuero_id"),
            Self::CrimeSpecifics => Some("general_id"),
            Self::CrimeSubtypes => Some("especifico_id"),
            Self::SpecializedDirectorates => Some("direccion_id"),
            Self::WeaponTypes => Some("categoria_id"),
            _ => None,
        }
    }

    /// Entity name used in not-found errors.
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::Departments => "Department",
            Self::Provinces => "Province",
            Self::Districts => "District",
            Self::CrimeJurisdictions => "CrimeJurisdiction",
            Self::CrimeGenerals => "CrimeGeneral",
            Self::CrimeSpecifics => "CrimeSpecific",
            Self::CrimeSubtypes => "CrimeSubtype",
            Self::PoliceDirectorates => "PoliceDirectorate",
            Self::SpecializedDirectorates => "SpecializedDirectorate",
            Self::PoliceDivisions => "PoliceDivision",
            Self::PoliceDepartments => "PoliceDepartment",
            Self::PoliceUnits => "PoliceUnit",
            Self::WeaponCategories => "WeaponCategory",
            Self::WeaponTypes => "WeaponType",
            Self::DetaineeStatuses => "DetaineeStatus",
            Self::ProsecutorOffices => "ProsecutorOffice",
            Self::Nationalities => "Nationality",
            Self::DocumentTypes => "DocumentType",
            Self::RequisitionTypes => "RequisitionType",
        }
    }

    /// Human label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Departments => "department",
            Self::Provinces => "province",
            Self::Districts => "district",
            Self::CrimeJurisdictions => "crime jurisdiction",
            Self::CrimeGenerals => "general crime",
            Self::CrimeSpecifics => "specific crime",
            Self::CrimeSubtypes => "crime subtype",
            Self::PoliceDirectorates => "police directorate",
            Self::SpecializedDirectorates => "specialized directorate",
            Self::PoliceDivisions => "police division",
            Self::PoliceDepartments => "police department",
            Self::PoliceUnits => "police unit",
            Self::WeaponCategories => "weapon category",
            Self::WeaponTypes => "weapon type",
            Self::DetaineeStatuses => "detainee status",
            Self::ProsecutorOffices => "prosecutor office",
            Self::Nationalities => "nationality",
            Self::DocumentTypes => "document type",
            Self::RequisitionTypes => "requisition type",
        }
    }
}

// ---------------------------------------------------------------------------
// Global cascade filter
// ---------------------------------------------------------------------------

/// Named parent-to-children lookups offered by `GET /reference/cascade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeFilter {
    ProvincesByDepartment,
    DistrictsByProvince,
    CrimeGeneralsByJurisdiction,
    CrimeSpecificsByGeneral,
    CrimeSubtypesBySpecific,
    SpecializedDirectoratesByDirectorate,
    WeaponTypesByCategory,
}

impl CascadeFilter {
    pub const ALL: [CascadeFilter; 7] = [
        Self::ProvincesByDepartment,
        Self::DistrictsByProvince,
        Self::CrimeGeneralsByJurisdiction,
        Self::CrimeSpecificsByGeneral,
        Self::CrimeSubtypesBySpecific,
        Self::SpecializedDirectoratesByDirectorate,
        Self::WeaponTypesByCategory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ProvincesByDepartment => "provinces_by_department",
            Self::DistrictsByProvince => "districts_by_province",
            Self::CrimeGeneralsByJurisdiction => "crime_generals_by_jurisdiction",
            Self::CrimeSpecificsByGeneral => "crime_specifics_by_general",
            Self::CrimeSubtypesBySpecific => "crime_subtypes_by_specific",
            Self::SpecializedDirectoratesByDirectorate => {
                "specialized_directorates_by_directorate"
            }
            Self::WeaponTypesByCategory => "weapon_types_by_category",
        }
    }

    /// Child table the filter lists.
    pub fn child_kind(self) -> ReferenceKind {
        match self {
            Self::ProvincesByDepartment => ReferenceKind::Provinces,
            Self::DistrictsByProvince => ReferenceKind::Districts,
            Self::CrimeGeneralsByJurisdiction => ReferenceKind::CrimeGenerals,
            Self::CrimeSpecificsByGeneral => ReferenceKind::CrimeSpecifics,
            Self::CrimeSubtypesBySpecific => ReferenceKind::CrimeSubtypes,
            Self::SpecializedDirectoratesByDirectorate => ReferenceKind::SpecializedDirectorates,
            Self::WeaponTypesByCategory => ReferenceKind::WeaponTypes,
        }
    }

    /// Names of every available filter, for error messages.
    pub fn available() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.name()).collect()
    }

    /// Resolve the `type` query parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
            CoreError::Validation(format!(
                "Parameter 'type' is required. Available types: {:?}",
                Self::available()
            ))
        })?;
        Self::ALL
            .into_iter()
            .find(|f| f.name() == raw)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown cascade type '{raw}'. Available types: {:?}",
                    Self::available()
                ))
            })
    }
}

/// Require a parent id for a children lookup.
pub fn require_parent_id(
    kind: ReferenceKind,
    parent_id: Option<DbId>,
) -> Result<DbId, CoreError> {
    let param = kind.parent_param().unwrap_or("parent_id");
    if kind.parent_column().is_none() {
        return Err(CoreError::Validation(format!(
            "{} has no parent to filter by",
            kind.slug()
        )));
    }
    parent_id.ok_or_else(|| CoreError::Validation(format!("Parameter '{param}' is required")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
