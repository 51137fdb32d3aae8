use crate::{ConceptId, EntityGraph, EntryId, FieldId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegritySeverity {
    Info,  // Allowed, but worth surfacing
    Error, // Broken reference
}

/// Kinds of problems the checker looks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityIssue {
    /// A concept lists a field id that does not exist
    DanglingConceptField { concept_id: ConceptId, field_id: FieldId },
    /// An entry holds a slot for a field id that does not exist
    DanglingEntryField { entry_id: EntryId, field_id: FieldId },
    /// A concept lists an entry id that does not exist
    DanglingConceptEntry { concept_id: ConceptId, entry_id: EntryId },
    /// An entry is listed by no concept
    OrphanEntry { entry_id: EntryId },
    /// An entry is listed more than once across concepts
    SharedEntry { entry_id: EntryId, listings: usize },
    /// A field id is listed by more than one concept, or twice by one
    SharedField { field_id: FieldId, listings: usize },
    /// An entry holds a value for a field its concept does not own
    ForeignFieldValue { entry_id: EntryId, field_id: FieldId },
}

impl IntegrityIssue {
    pub fn severity(&self) -> IntegritySeverity {
        match self {
            IntegrityIssue::ForeignFieldValue { .. } => IntegritySeverity::Info,
            _ => IntegritySeverity::Error,
        }
    }
}

/// Complete check result
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Check if there are any broken references
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity() == IntegritySeverity::Error)
    }

    /// Get all broken references
    pub fn errors(&self) -> Vec<&IntegrityIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == IntegritySeverity::Error)
            .collect()
    }

    /// Get informational findings
    pub fn info(&self) -> Vec<&IntegrityIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == IntegritySeverity::Info)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

impl EntityGraph {
    /// Verify that every referenced field and entry exists, and that every
    /// entry is listed by exactly one concept.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();
        let mut entry_listings: HashMap<&EntryId, usize> = HashMap::new();
        let mut field_listings: HashMap<&FieldId, usize> = HashMap::new();

        for concept in self.concepts().values() {
            for field_id in &concept.field_ids {
                *field_listings.entry(field_id).or_default() += 1;
                if self.field(field_id).is_none() {
                    report.issues.push(IntegrityIssue::DanglingConceptField {
                        concept_id: concept.id.clone(),
                        field_id: field_id.clone(),
                    });
                }
            }

            for entry_id in &concept.entry_ids {
                *entry_listings.entry(entry_id).or_default() += 1;
                let Some(entry) = self.entry(entry_id) else {
                    report.issues.push(IntegrityIssue::DanglingConceptEntry {
                        concept_id: concept.id.clone(),
                        entry_id: entry_id.clone(),
                    });
                    continue;
                };

                for field_id in entry.fields.keys() {
                    if self.field(field_id).is_none() {
                        report.issues.push(IntegrityIssue::DanglingEntryField {
                            entry_id: entry_id.clone(),
                            field_id: field_id.clone(),
                        });
                    } else if !concept.owns_field(field_id) {
                        report.issues.push(IntegrityIssue::ForeignFieldValue {
                            entry_id: entry_id.clone(),
                            field_id: field_id.clone(),
                        });
                    }
                }
            }
        }

        for entry_id in self.entries().keys() {
            match entry_listings.get(entry_id).copied().unwrap_or(0) {
                0 => report.issues.push(IntegrityIssue::OrphanEntry {
                    entry_id: entry_id.clone(),
                }),
                1 => {}
                listings => report.issues.push(IntegrityIssue::SharedEntry {
                    entry_id: entry_id.clone(),
                    listings,
                }),
            }
        }

        for (field_id, listings) in field_listings {
            if listings > 1 {
                report.issues.push(IntegrityIssue::SharedField {
                    field_id: field_id.clone(),
                    listings,
                });
            }
        }

        report
    }
}
