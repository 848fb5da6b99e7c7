//! Computer domain types.
//!
//! A computer is a compute resource (workstation, cluster frontend) that
//! calculations can be submitted to. It is identified by a unique label.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Attributes;
use crate::ports::RepositoryError;

/// A registered computer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computer {
    pub id: i64,
    pub uuid: Uuid,
    pub label: String,
    pub hostname: String,
    pub description: String,
    /// Transport plugin used to reach the machine (e.g. "core.ssh").
    pub transport_type: String,
    /// Scheduler plugin used to submit jobs (e.g. "core.slurm").
    pub scheduler_type: String,
    pub metadata: Attributes,
}

/// Data for registering a new computer.
#[derive(Debug, Clone, Default)]
pub struct NewComputer {
    pub label: String,
    pub hostname: String,
    pub description: String,
    pub transport_type: String,
    pub scheduler_type: String,
    pub metadata: Attributes,
}

impl NewComputer {
    /// Create a computer description with the required fields set.
    pub fn new(
        label: impl Into<String>,
        hostname: impl Into<String>,
        transport_type: impl Into<String>,
        scheduler_type: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            hostname: hostname.into(),
            transport_type: transport_type.into(),
            scheduler_type: scheduler_type.into(),
            ..Self::default()
        }
    }

    /// Check the fields every computer must carry.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        validate_fields(&self.label, &self.transport_type, &self.scheduler_type)
    }
}

impl Computer {
    /// Check the fields every computer must carry.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        validate_fields(&self.label, &self.transport_type, &self.scheduler_type)
    }
}

fn validate_fields(
    label: &str,
    transport_type: &str,
    scheduler_type: &str,
) -> Result<(), RepositoryError> {
    if label.trim().is_empty() {
        return Err(RepositoryError::Validation(
            "computer label cannot be empty".to_string(),
        ));
    }
    if transport_type.trim().is_empty() {
        return Err(RepositoryError::Validation(format!(
            "computer `{label}` has no transport type"
        )));
    }
    if scheduler_type.trim().is_empty() {
        return Err(RepositoryError::Validation(format!(
            "computer `{label}` has no scheduler type"
        )));
    }
    Ok(())
}
