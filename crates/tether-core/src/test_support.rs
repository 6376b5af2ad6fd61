//! Shared fixtures for core unit tests.
//!
//! A small project-tracker schema:
//!
//! ```text
//! projects --cascade--> issues --cascade--> comments --cascade--> reactions
//!          --cascade--> sprints --set_null--> issues (sprintId)
//!          --set_null--> documents
//!          --restrict--> releases
//! ```

use crate::{
    db::{MemoryStore, RelationRegistry},
    model::{CollectionModel, IndexModel, RelationModel, SchemaModel},
    types::DocId,
    value::Value,
};

pub(crate) const PROJECTS: &str = "projects";
pub(crate) const ISSUES: &str = "issues";
pub(crate) const COMMENTS: &str = "comments";
pub(crate) const REACTIONS: &str = "reactions";
pub(crate) const SPRINTS: &str = "sprints";
pub(crate) const DOCUMENTS: &str = "documents";
pub(crate) const RELEASES: &str = "releases";

static ISSUE_INDEXES: [IndexModel; 4] = [
    IndexModel::new("by_project", &["projectId"]),
    IndexModel::new("by_sprint", &["sprintId"]),
    IndexModel::new("by_parent", &["parentId"]),
    IndexModel::new("by_title", &["title", "projectId"]),
];
static COMMENT_INDEXES: [IndexModel; 1] = [IndexModel::new("by_issue", &["issueId"])];
static REACTION_INDEXES: [IndexModel; 1] = [IndexModel::new("by_comment", &["commentId"])];
static BY_PROJECT: [IndexModel; 1] = [IndexModel::new("by_project", &["projectId"])];

static COLLECTIONS: [CollectionModel; 7] = [
    CollectionModel::new(PROJECTS, &["name"], &[]).with_soft_delete(),
    CollectionModel::new(
        ISSUES,
        &["projectId", "sprintId", "parentId", "title"],
        &ISSUE_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(COMMENTS, &["issueId", "body"], &COMMENT_INDEXES).with_soft_delete(),
    CollectionModel::new(REACTIONS, &["commentId", "emoji"], &REACTION_INDEXES)
        .with_soft_delete(),
    CollectionModel::new(SPRINTS, &["projectId", "name"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(DOCUMENTS, &["projectId", "title"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(RELEASES, &["projectId", "tag"], &BY_PROJECT),
];

pub(crate) static SCHEMA: SchemaModel = SchemaModel::new(&COLLECTIONS);

pub(crate) const RELATIONS: [RelationModel; 7] = [
    RelationModel::cascade(PROJECTS, ISSUES, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, SPRINTS, "projectId", "by_project"),
    RelationModel::set_null(PROJECTS, DOCUMENTS, "projectId", "by_project"),
    RelationModel::restrict(PROJECTS, RELEASES, "projectId", "by_project"),
    RelationModel::cascade(ISSUES, COMMENTS, "issueId", "by_issue"),
    RelationModel::cascade(COMMENTS, REACTIONS, "commentId", "by_comment"),
    RelationModel::set_null(SPRINTS, ISSUES, "sprintId", "by_sprint"),
];

/// Registry over the fixture relations.
pub(crate) fn registry() -> RelationRegistry {
    RelationRegistry::validated(&SCHEMA, RELATIONS).expect("fixture registry should validate")
}

/// Registry with `issues` nested under `issues`, for cycle and depth tests.
pub(crate) fn nested_issue_registry() -> RelationRegistry {
    RelationRegistry::validated(
        &SCHEMA,
        [RelationModel::cascade(ISSUES, ISSUES, "parentId", "by_parent")],
    )
    .expect("nested registry should validate")
}

pub(crate) fn store() -> MemoryStore {
    MemoryStore::new(SCHEMA)
}

///
/// Seeded
///
/// Ids of one fully-populated project tree.
///

pub(crate) struct Seeded {
    pub project: DocId,
    pub issue: DocId,
    pub comment: DocId,
    pub reaction: DocId,
    pub sprint: DocId,
    pub document: DocId,
}

/// Seed one project with one of everything except releases.
pub(crate) fn seed_project(store: &mut MemoryStore) -> Seeded {
    let project = insert(store, PROJECTS, &[("name", Value::from("Apollo"))]);
    let sprint = insert(store, SPRINTS, &[("projectId", Value::Id(project))]);
    let issue = insert(
        store,
        ISSUES,
        &[
            ("projectId", Value::Id(project)),
            ("sprintId", Value::Id(sprint)),
            ("title", Value::from("launch")),
        ],
    );
    let comment = insert(store, COMMENTS, &[("issueId", Value::Id(issue))]);
    let reaction = insert(store, REACTIONS, &[("commentId", Value::Id(comment))]);
    let document = insert(store, DOCUMENTS, &[("projectId", Value::Id(project))]);

    Seeded {
        project,
        issue,
        comment,
        reaction,
        sprint,
        document,
    }
}

pub(crate) fn insert(store: &mut MemoryStore, collection: &str, fields: &[(&str, Value)]) -> DocId {
    store
        .insert(collection, fields.iter().cloned())
        .expect("fixture insert should succeed")
}
