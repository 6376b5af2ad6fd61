use crate::{
    db::{
        Document, DocumentStore, IndexQuery, MemoryStore, Patch, TombstoneQuery, TombstoneScan,
        Visibility,
    },
    error::ErrorClass,
    test_support::{COMMENTS, ISSUES, PROJECTS, RELEASES, insert, store},
    types::{DocId, Timestamp},
    value::Value,
};

fn by_project(project: DocId, visibility: Visibility<'_>, limit: usize) -> IndexQuery<'_> {
    IndexQuery {
        collection: ISSUES,
        index: "by_project",
        field: "projectId",
        value: Value::Id(project),
        visibility,
        limit,
    }
}

fn ids(docs: &[Document]) -> Vec<DocId> {
    docs.iter().map(|doc| doc.id).collect()
}

#[test]
fn insert_mints_ids_in_order() {
    let mut store = store();
    let a = insert(&mut store, PROJECTS, &[("name", Value::from("a"))]);
    let b = insert(&mut store, PROJECTS, &[("name", Value::from("b"))]);

    assert!(a < b);
    assert_eq!(store.count(PROJECTS), 2);
    assert_eq!(
        store.get(PROJECTS, a).and_then(|doc| doc.get("name")),
        Some(&Value::from("a"))
    );
}

#[test]
fn insert_rejects_undeclared_fields_and_collections() {
    let mut store = store();

    let err = store
        .insert(PROJECTS, [("owner", Value::from("x"))])
        .expect_err("undeclared field should be rejected");
    assert_eq!(err.class, ErrorClass::Unsupported);

    let err = store
        .insert("ghosts", [("name", Value::from("x"))])
        .expect_err("unknown collection should be rejected");
    assert!(err.message.contains("ghosts"));
}

#[test]
fn soft_delete_fields_only_settable_on_opted_in_collections() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[]);
    let release = insert(&mut store, RELEASES, &[("projectId", Value::Id(project))]);

    let flag = Patch::new().set("isDeleted", true);
    store
        .patch(PROJECTS, project, &flag)
        .expect("projects accept soft-delete fields");
    let err = store
        .patch(RELEASES, release, &flag)
        .expect_err("releases do not accept soft-delete fields");

    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(!store.get(RELEASES, release).is_some_and(|doc| doc.has("isDeleted")));
}

#[test]
fn index_query_filters_by_value_and_visibility() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[]);
    let other = insert(&mut store, PROJECTS, &[]);
    let live = insert(&mut store, ISSUES, &[("projectId", Value::Id(project))]);
    let flagged = insert(
        &mut store,
        ISSUES,
        &[
            ("projectId", Value::Id(project)),
            ("isDeleted", Value::Bool(true)),
        ],
    );
    insert(&mut store, ISSUES, &[("projectId", Value::Id(other))]);

    let any = store
        .query_index(&by_project(project, Visibility::Any, 10))
        .expect("query should run");
    assert_eq!(ids(&any), vec![live, flagged]);

    let visible = store
        .query_index(&by_project(
            project,
            Visibility::Live {
                flag_field: "isDeleted",
            },
            10,
        ))
        .expect("query should run");
    assert_eq!(ids(&visible), vec![live]);
}

#[test]
fn index_query_respects_limit() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[]);
    for _ in 0..5 {
        insert(&mut store, ISSUES, &[("projectId", Value::Id(project))]);
    }

    let docs = store
        .query_index(&by_project(project, Visibility::Any, 3))
        .expect("query should run");

    assert_eq!(docs.len(), 3);
}

#[test]
fn index_query_requires_a_matching_index() {
    let store = store();

    let mut query = by_project(DocId::from_u128(1), Visibility::Any, 1);
    query.index = "by_owner";
    let err = store
        .query_index(&query)
        .expect_err("undeclared index should fail");
    assert!(err.message.contains("index not found"));

    // by_title leads with title, so it cannot serve projectId equality
    let mut query = by_project(DocId::from_u128(1), Visibility::Any, 1);
    query.index = "by_title";
    let err = store
        .query_index(&query)
        .expect_err("non-leading field should fail");
    assert!(err.message.contains("cannot serve equality"));
}

#[test]
fn dropped_transaction_undoes_every_write() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[("name", Value::from("p"))]);
    let issue = insert(&mut store, ISSUES, &[("projectId", Value::Id(project))]);
    let before = store.clone();

    {
        let mut txn = store.begin();
        txn.insert(COMMENTS, [("issueId", Value::Id(issue))])
            .expect("insert should succeed");
        txn.patch(PROJECTS, project, &Patch::new().set("name", "renamed"))
            .expect("patch should succeed");
        txn.delete(ISSUES, issue).expect("delete should succeed");
        assert_eq!(txn.pending_writes(), 3);
    }

    for collection in [PROJECTS, ISSUES] {
        assert_eq!(
            store.documents(collection).collect::<Vec<_>>(),
            before.documents(collection).collect::<Vec<_>>(),
        );
    }
    assert_eq!(store.count(COMMENTS), 0);
}

#[test]
fn committed_transaction_keeps_writes() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[]);

    let mut txn = store.begin();
    txn.delete(PROJECTS, project).expect("delete should succeed");
    txn.commit();

    assert_eq!(store.count(PROJECTS), 0);
}

#[test]
fn transact_rolls_back_on_error() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[]);

    let err = store
        .transact(|txn| {
            txn.delete(PROJECTS, project)?;
            txn.delete(PROJECTS, project)
        })
        .expect_err("second delete should fail");

    assert!(err.is_not_found());
    assert!(store.get(PROJECTS, project).is_some());
}

#[test]
fn explicit_rollback_undoes_every_write() {
    let mut store = store();
    let project = insert(&mut store, PROJECTS, &[("name", Value::from("p"))]);

    let mut txn = store.begin();
    txn.patch(PROJECTS, project, &Patch::new().set("name", "renamed"))
        .expect("patch should succeed");
    txn.insert(PROJECTS, [("name", Value::from("q"))])
        .expect("insert should succeed");
    txn.rollback();

    assert_eq!(store.count(PROJECTS), 1);
    assert_eq!(
        store.get(PROJECTS, project).and_then(|doc| doc.get("name")),
        Some(&Value::from("p"))
    );
}

#[test]
fn rollback_to_savepoint_keeps_earlier_writes() {
    let mut store = store();
    let kept = insert(&mut store, PROJECTS, &[]);
    let undone = insert(&mut store, PROJECTS, &[("name", Value::from("p"))]);

    let mut txn = store.begin();
    txn.delete(PROJECTS, kept).expect("delete should succeed");
    let savepoint = txn.savepoint();
    txn.patch(PROJECTS, undone, &Patch::new().set("name", "renamed"))
        .expect("patch should succeed");
    txn.delete(PROJECTS, undone).expect("delete should succeed");

    txn.rollback_to(savepoint).expect("savepoint should be valid");
    assert_eq!(txn.pending_writes(), 1);
    assert!(txn.rollback_to(savepoint + 1).is_err());
    txn.commit();

    assert!(store.get(PROJECTS, kept).is_none());
    assert_eq!(
        store.get(PROJECTS, undone).and_then(|doc| doc.get("name")),
        Some(&Value::from("p"))
    );
}

#[test]
fn tombstone_scan_returns_only_expired_flagged_documents() {
    let mut store = store();
    let old = insert(
        &mut store,
        PROJECTS,
        &[
            ("isDeleted", Value::Bool(true)),
            ("deletedAt", Value::Timestamp(Timestamp::from_millis(100))),
        ],
    );
    insert(
        &mut store,
        PROJECTS,
        &[
            ("isDeleted", Value::Bool(true)),
            ("deletedAt", Value::Timestamp(Timestamp::from_millis(500))),
        ],
    );
    insert(
        &mut store,
        PROJECTS,
        &[("deletedAt", Value::Timestamp(Timestamp::from_millis(50)))],
    );
    let newer_old = insert(
        &mut store,
        PROJECTS,
        &[
            ("isDeleted", Value::Bool(true)),
            ("deletedAt", Value::Timestamp(Timestamp::from_millis(200))),
        ],
    );
    let query = |after: Option<DocId>| TombstoneQuery {
        collection: PROJECTS,
        flag_field: "isDeleted",
        at_field: "deletedAt",
        cutoff: Timestamp::from_millis(500),
        after,
        limit: 10,
    };

    let txn = store.begin();
    let expired = txn.scan_deleted(&query(None)).expect("scan should run");
    assert_eq!(ids(&expired), vec![old, newer_old]);

    // the cursor resumes strictly after the given id
    let rest = txn.scan_deleted(&query(Some(old))).expect("scan should run");
    assert_eq!(ids(&rest), vec![newer_old]);
}

#[test]
fn store_can_be_used_through_a_trait_object() {
    let mut store = MemoryStore::new(crate::test_support::SCHEMA);
    let project = insert(&mut store, PROJECTS, &[]);
    let dyn_store: &mut dyn DocumentStore = &mut store;

    dyn_store
        .delete(PROJECTS, project)
        .expect("delete should succeed");
    assert!(dyn_store.delete(PROJECTS, project).is_err());
}
