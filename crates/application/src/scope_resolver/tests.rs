use std::sync::Arc;
use std::sync::atomic::Ordering;

use folio_core::{AppError, CompanyId};
use folio_domain::{AreaId, AssignmentScope, FolderId, Lifecycle, RoleCode};
use proptest::prelude::*;

use crate::test_support::{FakeAccessRepository, role, snapshot};

use super::ScopeResolver;

fn resolver(repository: &Arc<FakeAccessRepository>) -> ScopeResolver {
    ScopeResolver::new(repository.clone())
}

#[tokio::test]
async fn company_wide_assignment_covers_any_folder() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let assignment = snapshot(company_id, AssignmentScope::Company, role(RoleCode::USER, Vec::new()));

    let result = resolver(&repository)
        .is_within_scope(FolderId::new(), &assignment)
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn area_assignment_covers_folder_three_levels_below_root() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area_root = repository.add_folder(None).await;
    let level_one = repository.add_folder(Some(area_root)).await;
    let level_two = repository.add_folder(Some(level_one)).await;
    let level_three = repository.add_folder(Some(level_two)).await;
    let area = repository.add_area(company_id, area_root).await;
    let assignment = snapshot(
        company_id,
        AssignmentScope::Area {
            area_id: area.area_id,
        },
        role(RoleCode::USER_RESPONSIBLE, Vec::new()),
    );

    let result = resolver(&repository)
        .is_within_scope(level_three, &assignment)
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn area_assignment_covers_folder_far_below_root() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area_root = repository.add_folder(None).await;
    let mut deepest = area_root;
    for _ in 0..200 {
        deepest = repository.add_folder(Some(deepest)).await;
    }
    let area = repository.add_area(company_id, area_root).await;
    let assignment = snapshot(
        company_id,
        AssignmentScope::Area {
            area_id: area.area_id,
        },
        role(RoleCode::USER_RESPONSIBLE, Vec::new()),
    );

    let result = resolver(&repository)
        .is_within_scope(deepest, &assignment)
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn area_assignment_excludes_sibling_tree() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let company_root = repository.add_folder(None).await;
    let area_root = repository.add_folder(Some(company_root)).await;
    let sibling_root = repository.add_folder(Some(company_root)).await;
    let sibling_child = repository.add_folder(Some(sibling_root)).await;
    let area = repository.add_area(company_id, area_root).await;
    let assignment = snapshot(
        company_id,
        AssignmentScope::Area {
            area_id: area.area_id,
        },
        role(RoleCode::USER_RESPONSIBLE, Vec::new()),
    );

    let within_sibling = resolver(&repository)
        .is_within_scope(sibling_child, &assignment)
        .await;
    assert!(matches!(within_sibling, Ok(false)));

    let within_parent = resolver(&repository)
        .is_within_scope(company_root, &assignment)
        .await;
    assert!(matches!(within_parent, Ok(false)));
}

#[tokio::test]
async fn area_root_match_skips_the_ancestry_walk() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area_root = repository.add_folder(None).await;
    let area = repository.add_area(company_id, area_root).await;
    let assignment = snapshot(
        company_id,
        AssignmentScope::Area {
            area_id: area.area_id,
        },
        role(RoleCode::USER, Vec::new()),
    );

    let result = resolver(&repository)
        .is_within_scope(area_root, &assignment)
        .await;
    assert!(matches!(result, Ok(true)));
    assert_eq!(repository.ancestry_reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn subarea_assignment_covers_only_its_own_folder() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area_root = repository.add_folder(None).await;
    let subarea_folder = repository.add_folder(Some(area_root)).await;
    let nested = repository.add_folder(Some(subarea_folder)).await;
    let area = repository.add_area(company_id, area_root).await;
    let subarea = repository.add_subarea(&area, subarea_folder).await;
    let assignment = snapshot(
        company_id,
        AssignmentScope::Subarea {
            area_id: area.area_id,
            subarea_id: subarea.subarea_id,
        },
        role(RoleCode::USER_RESPONSIBLE, Vec::new()),
    );

    let own = resolver(&repository)
        .is_within_scope(subarea_folder, &assignment)
        .await;
    assert!(matches!(own, Ok(true)));

    let nested_result = resolver(&repository)
        .is_within_scope(nested, &assignment)
        .await;
    assert!(matches!(nested_result, Ok(false)));
}

#[tokio::test]
async fn revoked_area_covers_nothing() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area_root = repository.add_folder(None).await;
    let area = repository.add_area(company_id, area_root).await;
    if let Some(stored) = repository.areas.lock().await.get_mut(&area.area_id) {
        stored.lifecycle = Lifecycle::Revoked;
    }
    let assignment = snapshot(
        company_id,
        AssignmentScope::Area {
            area_id: area.area_id,
        },
        role(RoleCode::USER, Vec::new()),
    );

    let result = resolver(&repository)
        .is_within_scope(area_root, &assignment)
        .await;
    assert!(matches!(result, Ok(false)));
}

#[tokio::test]
async fn store_failure_propagates() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    repository.fail_reads.store(true, Ordering::SeqCst);
    let assignment = snapshot(
        company_id,
        AssignmentScope::Area {
            area_id: AreaId::new(),
        },
        role(RoleCode::USER, Vec::new()),
    );

    let result = resolver(&repository)
        .is_within_scope(FolderId::new(), &assignment)
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn build_scope_fills_area_from_subarea() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area = repository.add_area(company_id, FolderId::new()).await;
    let subarea = repository.add_subarea(&area, FolderId::new()).await;

    let scope = resolver(&repository)
        .build_scope(company_id, None, Some(subarea.subarea_id))
        .await;
    assert!(scope.is_ok());

    let scope = scope.unwrap_or_default();
    assert_eq!(scope.area_id(), Some(area.area_id));
    assert_eq!(scope.subarea_id(), Some(subarea.subarea_id));
}

#[tokio::test]
async fn build_scope_rejects_subarea_outside_asserted_area() {
    let repository = Arc::new(FakeAccessRepository::default());
    let company_id = CompanyId::new();
    let area = repository.add_area(company_id, FolderId::new()).await;
    let other_area = repository.add_area(company_id, FolderId::new()).await;
    let subarea = repository.add_subarea(&area, FolderId::new()).await;

    let scope = resolver(&repository)
        .build_scope(
            company_id,
            Some(other_area.area_id),
            Some(subarea.subarea_id),
        )
        .await;
    assert!(matches!(scope, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn build_scope_rejects_area_of_another_company() {
    let repository = Arc::new(FakeAccessRepository::default());
    let area = repository.add_area(CompanyId::new(), FolderId::new()).await;

    let scope = resolver(&repository)
        .build_scope(CompanyId::new(), Some(area.area_id), None)
        .await;
    assert!(matches!(scope, Err(AppError::NotFound(_))));
}

fn ancestry_walk_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap_or_else(|_| unreachable!())
}

proptest! {
    #[test]
    fn ancestry_walk_terminates_and_matches_depth(depth in 1_usize..160, area_level in 0_usize..8) {
        let runtime = ancestry_walk_runtime();
        let outcome = runtime.block_on(async {
            let repository = Arc::new(FakeAccessRepository::default());
            let company_id = CompanyId::new();
            let mut chain = vec![repository.add_folder(None).await];
            for _ in 0..depth {
                let parent = chain.last().copied();
                chain.push(repository.add_folder(parent).await);
            }
            let area_level = area_level.min(depth);
            let area = repository.add_area(company_id, chain[area_level]).await;
            let assignment = snapshot(
                company_id,
                AssignmentScope::Area { area_id: area.area_id },
                role(RoleCode::USER, Vec::new()),
            );
            let leaf = chain[depth];
            let above_area = area_level.checked_sub(1).map(|level| chain[level]);

            let leaf_within = resolver(&repository).is_within_scope(leaf, &assignment).await;
            let above_within = match above_area {
                Some(folder_id) => resolver(&repository).is_within_scope(folder_id, &assignment).await,
                None => Ok(false),
            };
            (leaf_within, above_within)
        });

        prop_assert!(matches!(outcome.0, Ok(true)));
        prop_assert!(matches!(outcome.1, Ok(false)));
    }
}
