use crate::{
    db::{RegistryIssue, RelationRegistry},
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{DeletePolicy, RelationModel},
    test_support::{
        COMMENTS, DOCUMENTS, ISSUES, PROJECTS, RELATIONS, RELEASES, SCHEMA, SPRINTS, registry,
    },
};

#[test]
fn relations_for_parent_keeps_registry_order() {
    let registry = registry();

    let children: Vec<_> = registry
        .relations_for_parent(PROJECTS)
        .map(|relation| (relation.child, relation.on_delete))
        .collect();

    assert_eq!(
        children,
        vec![
            (ISSUES, DeletePolicy::Cascade),
            (SPRINTS, DeletePolicy::Cascade),
            (DOCUMENTS, DeletePolicy::SetNull),
            (RELEASES, DeletePolicy::Restrict),
        ]
    );
}

#[test]
fn unknown_parent_has_no_relations() {
    let registry = registry();

    assert_eq!(registry.relations_for_parent("ghosts").count(), 0);
    assert_eq!(registry.relations_for_parent(RELEASES).count(), 0);
    assert_eq!(registry.len(), RELATIONS.len());
}

#[test]
fn interleaved_parents_are_grouped_without_reordering() {
    let registry = RelationRegistry::new([
        RelationModel::cascade(PROJECTS, ISSUES, "projectId", "by_project"),
        RelationModel::cascade(ISSUES, COMMENTS, "issueId", "by_issue"),
        RelationModel::set_null(PROJECTS, DOCUMENTS, "projectId", "by_project"),
    ]);

    let projects: Vec<_> = registry
        .relations_for_parent(PROJECTS)
        .map(|relation| relation.child)
        .collect();
    assert_eq!(projects, vec![ISSUES, DOCUMENTS]);
}

#[test]
fn empty_registry_is_valid() {
    let registry = RelationRegistry::validated(&SCHEMA, Vec::<RelationModel>::new())
        .expect("empty registry is valid");

    assert!(registry.is_empty());
}

#[test]
fn validation_collects_every_issue() {
    let err = RelationRegistry::validated(
        &SCHEMA,
        [
            RelationModel::cascade("ghosts", ISSUES, "projectId", "by_project"),
            RelationModel::cascade(PROJECTS, "phantoms", "projectId", "by_project"),
            RelationModel::set_null(PROJECTS, ISSUES, "ownerId", "by_project"),
            RelationModel::set_null(PROJECTS, COMMENTS, "issueId", "by_author"),
        ],
    )
    .expect_err("broken registry should be rejected");

    assert_eq!(err.issues.len(), 5);
    assert!(matches!(
        &err.issues[0],
        RegistryIssue::UnknownParent { collection, .. } if collection == "ghosts"
    ));
    assert!(matches!(
        &err.issues[1],
        RegistryIssue::UnknownChild { collection, .. } if collection == "phantoms"
    ));
    assert!(matches!(
        &err.issues[2],
        RegistryIssue::UnknownForeignKey { field, .. } if field == "ownerId"
    ));
    assert!(matches!(
        &err.issues[3],
        RegistryIssue::IndexLeadingField { expected, .. } if expected == "ownerId"
    ));
    assert!(matches!(
        &err.issues[4],
        RegistryIssue::UnknownIndex { index, .. } if index == "by_author"
    ));
}

#[test]
fn index_must_lead_with_the_foreign_key() {
    let err = RelationRegistry::validated(
        &SCHEMA,
        [RelationModel::set_null(ISSUES, ISSUES, "projectId", "by_title")],
    )
    .expect_err("by_title leads with title");

    assert_eq!(
        err.issues,
        vec![RegistryIssue::IndexLeadingField {
            relation: "issues -[set_null]-> issues.projectId via by_title".to_string(),
            index: "by_title".to_string(),
            expected: "projectId".to_string(),
            found: Some("title".to_string()),
        }]
    );
}

#[test]
fn duplicate_relations_are_rejected() {
    let relation = RelationModel::cascade(PROJECTS, ISSUES, "projectId", "by_project");
    let err = RelationRegistry::validated(&SCHEMA, [relation, relation])
        .expect_err("duplicate should be rejected");

    assert_eq!(
        err.issues,
        vec![RegistryIssue::Duplicate {
            relation: relation.to_string(),
        }]
    );
}

#[test]
fn cascade_into_collection_without_soft_delete_is_rejected() {
    let err = RelationRegistry::validated(
        &SCHEMA,
        [RelationModel::cascade(PROJECTS, RELEASES, "projectId", "by_project")],
    )
    .expect_err("releases cannot be flagged");

    assert!(matches!(
        err.issues.as_slice(),
        [RegistryIssue::SoftDeleteUnsupported { collection, .. }] if collection == RELEASES
    ));
}

#[test]
fn registry_error_converts_to_registry_origin() {
    let err = RelationRegistry::validated(
        &SCHEMA,
        [RelationModel::cascade("ghosts", ISSUES, "projectId", "by_project")],
    )
    .expect_err("unknown parent");

    let internal = InternalError::from(err);
    assert_eq!(internal.origin, ErrorOrigin::Registry);
    assert_eq!(internal.class, ErrorClass::Unsupported);
    assert!(internal.message.starts_with("invalid relation registry (1 issue(s))"));
    assert!(internal.message.contains("'ghosts' is not in the schema"));
}
