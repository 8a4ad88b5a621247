use folio_core::AppResult;
use folio_domain::{
    Lifecycle, Permission, PermissionAction, PermissionCategory, PermissionCode, RoleCode,
};

use folio_domain::PermissionAction::{Assign, Create, Delete, Download, List, Read, Update, Upload};

/// Permission rows seeded for every deployment.
///
/// Mirrors `migrations/0002_seed_system_catalog.sql`.
const SYSTEM_PERMISSIONS: &[(&str, PermissionCategory, &[PermissionAction])] = &[
    ("area_read", PermissionCategory::Area, &[Read, List]),
    ("area_create", PermissionCategory::Area, &[Create]),
    ("area_update", PermissionCategory::Area, &[Update]),
    ("area_delete", PermissionCategory::Area, &[Delete]),
    ("subarea_read", PermissionCategory::Subarea, &[Read, List]),
    ("subarea_create", PermissionCategory::Subarea, &[Create]),
    ("subarea_update", PermissionCategory::Subarea, &[Update]),
    ("subarea_delete", PermissionCategory::Subarea, &[Delete]),
    ("file_read", PermissionCategory::File, &[Read, List, Download]),
    ("file_write_subarea", PermissionCategory::File, &[Upload, Update]),
    ("file_delete", PermissionCategory::File, &[Delete]),
    ("user_read", PermissionCategory::User, &[Read, List]),
    (
        PermissionCode::USER_ROLE_MANAGE,
        PermissionCategory::User,
        &[Create, Assign, List],
    ),
    ("company_read", PermissionCategory::Company, &[Read]),
    ("company_update", PermissionCategory::Company, &[Update]),
    (
        "system_manage",
        PermissionCategory::System,
        &[Create, Read, Update, Delete],
    ),
];

const USER_PERMISSIONS: &[&str] = &["area_read", "subarea_read", "file_read"];

const USER_RESPONSIBLE_PERMISSIONS: &[&str] = &[
    "area_read",
    "subarea_read",
    "file_read",
    "file_write_subarea",
];

const SUBAREA_MANAGER_PERMISSIONS: &[&str] = &[
    "area_read",
    "subarea_read",
    "subarea_update",
    "file_read",
    "file_write_subarea",
    "file_delete",
    "user_read",
];

const AREA_MANAGER_PERMISSIONS: &[&str] = &[
    "area_read",
    "area_update",
    "subarea_read",
    "subarea_create",
    "subarea_update",
    "subarea_delete",
    "file_read",
    "file_write_subarea",
    "file_delete",
    "user_read",
    PermissionCode::USER_ROLE_MANAGE,
];

/// Builds the seeded system permissions.
pub(crate) fn system_permissions() -> AppResult<Vec<Permission>> {
    SYSTEM_PERMISSIONS
        .iter()
        .map(|(code, category, actions)| {
            Permission::new(
                PermissionCode::new(*code)?,
                *category,
                actions.iter().copied(),
                Lifecycle::Active,
            )
        })
        .collect()
}

/// Builds the seeded system roles as `(code, permission codes)` pairs.
pub(crate) fn system_roles() -> AppResult<Vec<(RoleCode, Vec<PermissionCode>)>> {
    let everything: Vec<&str> = SYSTEM_PERMISSIONS.iter().map(|(code, _, _)| *code).collect();
    let company_wide: Vec<&str> = everything
        .iter()
        .copied()
        .filter(|code| *code != "system_manage")
        .collect();

    [
        (RoleCode::ADMIN, everything.as_slice()),
        (RoleCode::COMPANY_ADMIN, company_wide.as_slice()),
        (RoleCode::AREA_MANAGER, AREA_MANAGER_PERMISSIONS),
        (RoleCode::SUBAREA_MANAGER, SUBAREA_MANAGER_PERMISSIONS),
        (RoleCode::USER_RESPONSIBLE, USER_RESPONSIBLE_PERMISSIONS),
        (RoleCode::USER, USER_PERMISSIONS),
    ]
    .into_iter()
    .map(|(code, permissions)| {
        Ok((
            RoleCode::new(code)?,
            permissions
                .iter()
                .map(|permission| PermissionCode::new(*permission))
                .collect::<AppResult<Vec<_>>>()?,
        ))
    })
    .collect()
}
