use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{DeletePolicy, RelationModel, SchemaModel},
};
use std::{collections::BTreeSet, fmt};
use thiserror::Error as ThisError;

///
/// RegistryIssue
///
/// One problem found while checking a relation against the schema.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryIssue {
    #[error("relation '{relation}': parent collection '{collection}' is not in the schema")]
    UnknownParent { relation: String, collection: String },

    #[error("relation '{relation}': child collection '{collection}' is not in the schema")]
    UnknownChild { relation: String, collection: String },

    #[error("relation '{relation}': field '{field}' is not declared on '{collection}'")]
    UnknownForeignKey {
        relation: String,
        collection: String,
        field: String,
    },

    #[error("relation '{relation}': index '{index}' is not declared on '{collection}'")]
    UnknownIndex {
        relation: String,
        collection: String,
        index: String,
    },

    #[error(
        "relation '{relation}': index '{index}' must lead with '{expected}', found {}",
        .found.as_deref().unwrap_or("no fields")
    )]
    IndexLeadingField {
        relation: String,
        index: String,
        expected: String,
        found: Option<String>,
    },

    #[error(
        "relation '{relation}': cascade child '{collection}' does not carry soft-delete fields"
    )]
    SoftDeleteUnsupported { relation: String, collection: String },

    #[error("relation '{relation}' is declared more than once")]
    Duplicate { relation: String },
}

///
/// RegistryError
///
/// Aggregate of every issue found in one registry.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub struct RegistryError {
    pub issues: Vec<RegistryIssue>,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid relation registry ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }

        Ok(())
    }
}

impl From<RegistryError> for InternalError {
    fn from(err: RegistryError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Registry, err.to_string())
    }
}

// Check every relation against the schema and collect all issues.
pub(super) fn validate_registry(
    schema: &SchemaModel,
    relations: &[RelationModel],
) -> Result<(), RegistryError> {
    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();

    for relation in relations {
        let label = relation.to_string();

        // Phase 1: identity.
        if !seen.insert((relation.parent, relation.child, relation.foreign_key)) {
            issues.push(RegistryIssue::Duplicate {
                relation: label.clone(),
            });
        }

        // Phase 2: both ends exist.
        if schema.collection(relation.parent).is_none() {
            issues.push(RegistryIssue::UnknownParent {
                relation: label.clone(),
                collection: relation.parent.to_string(),
            });
        }
        let Some(child) = schema.collection(relation.child) else {
            issues.push(RegistryIssue::UnknownChild {
                relation: label,
                collection: relation.child.to_string(),
            });
            continue;
        };

        // Phase 3: the child side can serve the lookup.
        if !child.has_field(relation.foreign_key) {
            issues.push(RegistryIssue::UnknownForeignKey {
                relation: label.clone(),
                collection: child.name.to_string(),
                field: relation.foreign_key.to_string(),
            });
        }
        match child.index(relation.index) {
            None => issues.push(RegistryIssue::UnknownIndex {
                relation: label.clone(),
                collection: child.name.to_string(),
                index: relation.index.to_string(),
            }),
            Some(index) if !index.leads_with(relation.foreign_key) => {
                issues.push(RegistryIssue::IndexLeadingField {
                    relation: label.clone(),
                    index: index.name.to_string(),
                    expected: relation.foreign_key.to_string(),
                    found: index.leading_field().map(str::to_string),
                });
            }
            Some(_) => {}
        }

        // Phase 4: cascade children must accept the soft-delete fields.
        if relation.on_delete == DeletePolicy::Cascade && !child.soft_delete {
            issues.push(RegistryIssue::SoftDeleteUnsupported {
                relation: label,
                collection: child.name.to_string(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(RegistryError { issues })
    }
}
