//! Shared schema, relation registry, and seed helpers for Tether tests.
//!
//! Models an issue tracker: workspaces own teams and projects, projects own
//! issues, sprints, and a handful of configuration records, and issues own
//! their comments, activity, links, watchers, time entries, and custom
//! field values.

use tether_core::{
    db::{MemoryStore, RegistryError, RelationRegistry},
    error::InternalError,
    model::{CollectionModel, IndexModel, RelationModel, SchemaModel},
    types::DocId,
    value::Value,
};

///
/// Collection names
///

pub mod collections {
    pub const WORKSPACES: &str = "workspaces";
    pub const TEAMS: &str = "teams";
    pub const TEAM_MEMBERS: &str = "teamMembers";
    pub const USERS: &str = "users";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const PROJECTS: &str = "projects";
    pub const PROJECT_MEMBERS: &str = "projectMembers";
    pub const LABELS: &str = "labels";
    pub const WEBHOOKS: &str = "webhooks";
    pub const WEBHOOK_EXECUTIONS: &str = "webhookExecutions";
    pub const SAVED_FILTERS: &str = "savedFilters";
    pub const AUTOMATION_RULES: &str = "automationRules";
    pub const CUSTOM_FIELDS: &str = "customFields";
    pub const CUSTOM_FIELD_VALUES: &str = "customFieldValues";
    pub const ISSUE_TEMPLATES: &str = "issueTemplates";
    pub const DOCUMENTS: &str = "documents";
    pub const CALENDAR_EVENTS: &str = "calendarEvents";
    pub const SPRINTS: &str = "sprints";
    pub const ISSUES: &str = "issues";
    pub const ISSUE_COMMENTS: &str = "issueComments";
    pub const ISSUE_COMMENT_REACTIONS: &str = "issueCommentReactions";
    pub const ISSUE_ACTIVITY: &str = "issueActivity";
    pub const ISSUE_LINKS: &str = "issueLinks";
    pub const ISSUE_WATCHERS: &str = "issueWatchers";
    pub const TIME_ENTRIES: &str = "timeEntries";
}

use collections::*;

//
// Indexes
//

static NO_INDEXES: [IndexModel; 0] = [];
static BY_WORKSPACE: [IndexModel; 1] = [IndexModel::new("by_workspace", &["workspaceId"])];
static BY_TEAM: [IndexModel; 1] = [IndexModel::new("by_team", &["teamId"])];
static BY_USER: [IndexModel; 1] = [IndexModel::new("by_user", &["userId"])];
static BY_PROJECT: [IndexModel; 1] = [IndexModel::new("by_project", &["projectId"])];
static BY_ISSUE: [IndexModel; 1] = [IndexModel::new("by_issue", &["issueId"])];
static BY_WEBHOOK: [IndexModel; 1] = [IndexModel::new("by_webhook", &["webhookId"])];
static BY_COMMENT: [IndexModel; 1] = [IndexModel::new("by_comment", &["commentId"])];

static PROJECT_INDEXES: [IndexModel; 2] = [
    IndexModel::new("by_workspace", &["workspaceId"]),
    IndexModel::new("by_team", &["teamId"]),
];
static PROJECT_MEMBER_INDEXES: [IndexModel; 2] = [
    IndexModel::new("by_project", &["projectId"]),
    IndexModel::new("by_user", &["userId"]),
];
static ISSUE_INDEXES: [IndexModel; 3] = [
    IndexModel::new("by_project", &["projectId"]),
    IndexModel::new("by_sprint", &["sprintId"]),
    IndexModel::new("by_project_status", &["projectId", "status"]),
];
static ISSUE_LINK_INDEXES: [IndexModel; 2] = [
    IndexModel::new("by_from_issue", &["fromIssueId"]),
    IndexModel::new("by_to_issue", &["toIssueId"]),
];
static ISSUE_WATCHER_INDEXES: [IndexModel; 2] = [
    IndexModel::new("by_issue", &["issueId"]),
    IndexModel::new("by_user", &["userId"]),
];
static CUSTOM_FIELD_VALUE_INDEXES: [IndexModel; 2] = [
    IndexModel::new("by_issue", &["issueId"]),
    IndexModel::new("by_field", &["fieldId"]),
];

//
// Collections
//

static COLLECTIONS: [CollectionModel; 25] = [
    CollectionModel::new(WORKSPACES, &["name"], &NO_INDEXES).with_soft_delete(),
    CollectionModel::new(TEAMS, &["workspaceId", "name"], &BY_WORKSPACE).with_soft_delete(),
    CollectionModel::new(TEAM_MEMBERS, &["teamId", "userId"], &BY_TEAM).with_soft_delete(),
    CollectionModel::new(USERS, &["name"], &NO_INDEXES),
    CollectionModel::new(NOTIFICATIONS, &["userId", "message"], &BY_USER).with_soft_delete(),
    CollectionModel::new(
        PROJECTS,
        &["workspaceId", "teamId", "name"],
        &PROJECT_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(
        PROJECT_MEMBERS,
        &["projectId", "userId", "role"],
        &PROJECT_MEMBER_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(LABELS, &["projectId", "name"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(WEBHOOKS, &["projectId", "url"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(WEBHOOK_EXECUTIONS, &["webhookId", "status"], &BY_WEBHOOK)
        .with_soft_delete(),
    CollectionModel::new(SAVED_FILTERS, &["projectId", "name"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(AUTOMATION_RULES, &["projectId", "name"], &BY_PROJECT)
        .with_soft_delete(),
    CollectionModel::new(CUSTOM_FIELDS, &["projectId", "name"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(
        CUSTOM_FIELD_VALUES,
        &["issueId", "fieldId", "value"],
        &CUSTOM_FIELD_VALUE_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(ISSUE_TEMPLATES, &["projectId", "name"], &BY_PROJECT)
        .with_soft_delete(),
    CollectionModel::new(DOCUMENTS, &["projectId", "title"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(CALENDAR_EVENTS, &["projectId", "title"], &BY_PROJECT),
    CollectionModel::new(SPRINTS, &["projectId", "name"], &BY_PROJECT).with_soft_delete(),
    CollectionModel::new(
        ISSUES,
        &["projectId", "sprintId", "title", "status"],
        &ISSUE_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(ISSUE_COMMENTS, &["issueId", "body"], &BY_ISSUE).with_soft_delete(),
    CollectionModel::new(ISSUE_COMMENT_REACTIONS, &["commentId", "emoji"], &BY_COMMENT)
        .with_soft_delete(),
    CollectionModel::new(ISSUE_ACTIVITY, &["issueId", "action"], &BY_ISSUE).with_soft_delete(),
    CollectionModel::new(
        ISSUE_LINKS,
        &["fromIssueId", "toIssueId", "kind"],
        &ISSUE_LINK_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(
        ISSUE_WATCHERS,
        &["issueId", "userId"],
        &ISSUE_WATCHER_INDEXES,
    )
    .with_soft_delete(),
    CollectionModel::new(TIME_ENTRIES, &["issueId", "minutes"], &BY_ISSUE).with_soft_delete(),
];

/// Schema every fixture registry is validated against.
pub static SCHEMA: SchemaModel = SchemaModel::new(&COLLECTIONS);

///
/// RELATIONS
///
/// Registry order is processing order: issue relations first, then
/// project, workspace, sprint, user, team, webhook, comment, and custom
/// field relations.
///

pub const RELATIONS: [RelationModel; 27] = [
    // issues
    RelationModel::cascade(ISSUES, ISSUE_COMMENTS, "issueId", "by_issue"),
    RelationModel::cascade(ISSUES, ISSUE_ACTIVITY, "issueId", "by_issue"),
    RelationModel::cascade(ISSUES, ISSUE_LINKS, "fromIssueId", "by_from_issue"),
    RelationModel::cascade(ISSUES, ISSUE_LINKS, "toIssueId", "by_to_issue"),
    RelationModel::cascade(ISSUES, ISSUE_WATCHERS, "issueId", "by_issue"),
    RelationModel::cascade(ISSUES, TIME_ENTRIES, "issueId", "by_issue"),
    RelationModel::cascade(ISSUES, CUSTOM_FIELD_VALUES, "issueId", "by_issue"),
    // projects
    RelationModel::cascade(PROJECTS, ISSUES, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, SPRINTS, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, PROJECT_MEMBERS, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, LABELS, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, WEBHOOKS, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, SAVED_FILTERS, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, AUTOMATION_RULES, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, CUSTOM_FIELDS, "projectId", "by_project"),
    RelationModel::cascade(PROJECTS, ISSUE_TEMPLATES, "projectId", "by_project"),
    RelationModel::set_null(PROJECTS, DOCUMENTS, "projectId", "by_project"),
    RelationModel::set_null(PROJECTS, CALENDAR_EVENTS, "projectId", "by_project"),
    // workspaces
    RelationModel::cascade(WORKSPACES, TEAMS, "workspaceId", "by_workspace"),
    RelationModel::cascade(WORKSPACES, PROJECTS, "workspaceId", "by_workspace"),
    // sprints
    RelationModel::set_null(SPRINTS, ISSUES, "sprintId", "by_sprint"),
    // users
    RelationModel::cascade(USERS, NOTIFICATIONS, "userId", "by_user"),
    // teams
    RelationModel::cascade(TEAMS, TEAM_MEMBERS, "teamId", "by_team"),
    RelationModel::set_null(TEAMS, PROJECTS, "teamId", "by_team"),
    // webhooks
    RelationModel::cascade(WEBHOOKS, WEBHOOK_EXECUTIONS, "webhookId", "by_webhook"),
    // comments
    RelationModel::cascade(ISSUE_COMMENTS, ISSUE_COMMENT_REACTIONS, "commentId", "by_comment"),
    // custom fields
    RelationModel::cascade(CUSTOM_FIELDS, CUSTOM_FIELD_VALUES, "fieldId", "by_field"),
];

/// Validated registry over [`RELATIONS`].
pub fn registry() -> Result<RelationRegistry, RegistryError> {
    RelationRegistry::validated(&SCHEMA, RELATIONS)
}

/// Validated registry over [`RELATIONS`] followed by `extra`.
pub fn registry_with(
    extra: impl IntoIterator<Item = RelationModel>,
) -> Result<RelationRegistry, RegistryError> {
    RelationRegistry::validated(&SCHEMA, RELATIONS.into_iter().chain(extra))
}

/// Empty store over [`SCHEMA`].
#[must_use]
pub fn store() -> MemoryStore {
    MemoryStore::new(SCHEMA)
}

///
/// ProjectTree
///
/// Ids of one seeded project and the records hanging off it.
///

#[derive(Clone, Debug)]
pub struct ProjectTree {
    pub workspace: DocId,
    pub team: DocId,
    pub project: DocId,
    pub sprint: DocId,
    pub issues: Vec<DocId>,
    pub comments: Vec<DocId>,
    pub reactions: Vec<DocId>,
    pub custom_field: DocId,
    pub webhook: DocId,
    pub document: DocId,
    pub calendar_event: DocId,
}

/// Seed a workspace with one team and one project carrying `issue_count`
/// issues, each with one comment, one reaction, one activity entry, and one
/// custom field value. Consecutive issues are linked.
pub fn seed_project_tree(
    store: &mut MemoryStore,
    issue_count: usize,
) -> Result<ProjectTree, InternalError> {
    let workspace = store.insert(WORKSPACES, [("name", Value::from("Acme"))])?;
    let team = store.insert(
        TEAMS,
        [
            ("workspaceId", Value::Id(workspace)),
            ("name", Value::from("Platform")),
        ],
    )?;
    let project = store.insert(
        PROJECTS,
        [
            ("workspaceId", Value::Id(workspace)),
            ("teamId", Value::Id(team)),
            ("name", Value::from("Apollo")),
        ],
    )?;
    let sprint = store.insert(
        SPRINTS,
        [
            ("projectId", Value::Id(project)),
            ("name", Value::from("Sprint 1")),
        ],
    )?;
    let custom_field = store.insert(
        CUSTOM_FIELDS,
        [
            ("projectId", Value::Id(project)),
            ("name", Value::from("Severity")),
        ],
    )?;
    let webhook = store.insert(
        WEBHOOKS,
        [
            ("projectId", Value::Id(project)),
            ("url", Value::from("https://hooks.example/apollo")),
        ],
    )?;
    store.insert(
        WEBHOOK_EXECUTIONS,
        [
            ("webhookId", Value::Id(webhook)),
            ("status", Value::from("ok")),
        ],
    )?;
    let document = store.insert(
        DOCUMENTS,
        [
            ("projectId", Value::Id(project)),
            ("title", Value::from("Roadmap")),
        ],
    )?;
    let calendar_event = store.insert(
        CALENDAR_EVENTS,
        [
            ("projectId", Value::Id(project)),
            ("title", Value::from("Launch")),
        ],
    )?;

    let mut issues = Vec::with_capacity(issue_count);
    let mut comments = Vec::with_capacity(issue_count);
    let mut reactions = Vec::with_capacity(issue_count);
    for n in 0..issue_count {
        let issue = store.insert(
            ISSUES,
            [
                ("projectId", Value::Id(project)),
                ("sprintId", Value::Id(sprint)),
                ("title", Value::Text(format!("Issue {n}"))),
                ("status", Value::from("todo")),
            ],
        )?;
        let comment = store.insert(
            ISSUE_COMMENTS,
            [
                ("issueId", Value::Id(issue)),
                ("body", Value::from("looks good")),
            ],
        )?;
        reactions.push(store.insert(
            ISSUE_COMMENT_REACTIONS,
            [
                ("commentId", Value::Id(comment)),
                ("emoji", Value::from("+1")),
            ],
        )?);
        store.insert(
            ISSUE_ACTIVITY,
            [
                ("issueId", Value::Id(issue)),
                ("action", Value::from("created")),
            ],
        )?;
        store.insert(
            CUSTOM_FIELD_VALUES,
            [
                ("issueId", Value::Id(issue)),
                ("fieldId", Value::Id(custom_field)),
                ("value", Value::from("high")),
            ],
        )?;
        if let Some(&previous) = issues.last() {
            store.insert(
                ISSUE_LINKS,
                [
                    ("fromIssueId", Value::Id(previous)),
                    ("toIssueId", Value::Id(issue)),
                    ("kind", Value::from("blocks")),
                ],
            )?;
        }

        issues.push(issue);
        comments.push(comment);
    }

    Ok(ProjectTree {
        workspace,
        team,
        project,
        sprint,
        issues,
        comments,
        reactions,
        custom_field,
        webhook,
        document,
        calendar_event,
    })
}
