use deadpool_postgres::{Pool, Transaction};
use uuid::Uuid;

use crate::config::ConceptDefaults;
use crate::error::AppError;

const FIND_CONCEPT: &str = "SELECT concept_id FROM concept_name \
     WHERE lower(name) = lower($1) AND concept_name_type = $2 AND locale = $3 \
     ORDER BY concept_id LIMIT 1";

const INSERT_CONCEPT: &str = "INSERT INTO concept \
     (class_id, datatype_id, retired, is_set, creator, date_created, uuid) \
     VALUES ($1, $2, $3, $4, $5, LOCALTIMESTAMP, $6) RETURNING concept_id";

const INSERT_CONCEPT_NAME: &str = "INSERT INTO concept_name \
     (concept_id, name, locale, creator, date_created, voided, uuid, concept_name_type) \
     VALUES ($1, $2, $3, $4, LOCALTIMESTAMP, FALSE, $5, $6)";

const INSERT_REFERENCE_TERM: &str = "INSERT INTO concept_reference_term \
     (concept_source_id, code, creator, date_created, retired, uuid) \
     VALUES ($1, $2, $3, LOCALTIMESTAMP, $4, $5) RETURNING concept_reference_term_id";

const INSERT_REFERENCE_MAP: &str = "INSERT INTO concept_reference_map \
     (concept_reference_term_id, concept_map_type_id, creator, date_created, concept_id, uuid) \
     VALUES ($1, $2, $3, LOCALTIMESTAMP, $4, $5) RETURNING concept_map_id";

const INSERT_SET_MEMBER: &str = "INSERT INTO concept_set \
     (concept_set, concept_id, creator, date_created, uuid) \
     VALUES ($1, $2, $3, LOCALTIMESTAMP, $4)";

/// Result of mapping a SNOMED CT code onto a diagnosis concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// The concept existed; only the reference term and map were added
    MappingAdded { concept_id: i32 },
    /// A new diagnosis concept was created together with its mapping
    ConceptCreated { concept_id: i32 },
}

impl MappingOutcome {
    pub fn concept_id(&self) -> i32 {
        match self {
            MappingOutcome::MappingAdded { concept_id }
            | MappingOutcome::ConceptCreated { concept_id } => *concept_id,
        }
    }

    /// Message returned to the caller of `POST /snomed`
    pub fn message(&self, concept_name: &str) -> String {
        match self {
            MappingOutcome::MappingAdded { .. } => {
                format!("SNOMED CT Mapping added for diagnosis {}", concept_name)
            }
            MappingOutcome::ConceptCreated { concept_id } => format!(
                "Diagnosis {} is created with Concept ID {} ",
                concept_name, concept_id
            ),
        }
    }
}

/// Repository for diagnosis concepts and their terminology mappings
#[derive(Clone)]
pub struct ConceptRepository {
    pool: Pool,
    defaults: ConceptDefaults,
}

impl ConceptRepository {
    pub fn new(pool: Pool, defaults: ConceptDefaults) -> Self {
        Self { pool, defaults }
    }

    /// Find a concept by its fully specified name (case-insensitive)
    pub async fn find_concept(&self, name: &str) -> Result<Option<i32>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                FIND_CONCEPT,
                &[&name, &self.defaults.name_type, &self.defaults.locale],
            )
            .await?;
        Ok(row.map(|row| row.get(0)))
    }

    /// Attach `snomed_code` to the concept named `concept_name`, creating the
    /// concept first if needed. All rows are written in one transaction.
    pub async fn map_snomed(
        &self,
        concept_name: &str,
        snomed_code: &str,
    ) -> Result<MappingOutcome, AppError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let existing = tx
            .query_opt(
                FIND_CONCEPT,
                &[&concept_name, &self.defaults.name_type, &self.defaults.locale],
            )
            .await?
            .map(|row| row.get::<_, i32>(0));

        let outcome = match existing {
            Some(concept_id) => {
                let term_id = self.insert_reference_term(&tx, snomed_code).await?;
                self.insert_reference_map(&tx, concept_id, term_id).await?;
                MappingOutcome::MappingAdded { concept_id }
            }
            None => {
                let concept_id = self.insert_concept(&tx).await?;
                self.insert_concept_name(&tx, concept_id, concept_name).await?;
                let term_id = self.insert_reference_term(&tx, snomed_code).await?;
                self.insert_reference_map(&tx, concept_id, term_id).await?;
                self.insert_diagnosis_set_member(&tx, concept_id).await?;
                MappingOutcome::ConceptCreated { concept_id }
            }
        };

        tx.commit().await?;

        tracing::info!(
            concept_id = outcome.concept_id(),
            snomed_code,
            created = matches!(outcome, MappingOutcome::ConceptCreated { .. }),
            "SNOMED CT mapping stored"
        );
        Ok(outcome)
    }

    async fn insert_concept(&self, tx: &Transaction<'_>) -> Result<i32, AppError> {
        let d = &self.defaults;
        let row = tx
            .query_one(
                INSERT_CONCEPT,
                &[
                    &d.class_id,
                    &d.datatype_id,
                    &d.retired,
                    &d.is_set,
                    &d.creator_id,
                    &Uuid::new_v4(),
                ],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn insert_concept_name(
        &self,
        tx: &Transaction<'_>,
        concept_id: i32,
        name: &str,
    ) -> Result<(), AppError> {
        let d = &self.defaults;
        tx.execute(
            INSERT_CONCEPT_NAME,
            &[
                &concept_id,
                &name,
                &d.locale,
                &d.creator_id,
                &Uuid::new_v4(),
                &d.name_type,
            ],
        )
        .await?;
        Ok(())
    }

    async fn insert_reference_term(
        &self,
        tx: &Transaction<'_>,
        code: &str,
    ) -> Result<i32, AppError> {
        let d = &self.defaults;
        let row = tx
            .query_one(
                INSERT_REFERENCE_TERM,
                &[&d.source_id, &code, &d.creator_id, &d.retired, &Uuid::new_v4()],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn insert_reference_map(
        &self,
        tx: &Transaction<'_>,
        concept_id: i32,
        reference_term_id: i32,
    ) -> Result<i32, AppError> {
        let d = &self.defaults;
        let row = tx
            .query_one(
                INSERT_REFERENCE_MAP,
                &[
                    &reference_term_id,
                    &d.map_type_id,
                    &d.creator_id,
                    &concept_id,
                    &Uuid::new_v4(),
                ],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn insert_diagnosis_set_member(
        &self,
        tx: &Transaction<'_>,
        concept_id: i32,
    ) -> Result<(), AppError> {
        let d = &self.defaults;
        tx.execute(
            INSERT_SET_MEMBER,
            &[&d.diagnosis_set_id, &concept_id, &d.creator_id, &Uuid::new_v4()],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let added = MappingOutcome::MappingAdded { concept_id: 7 };
        assert_eq!(
            added.message("Influenza"),
            "SNOMED CT Mapping added for diagnosis Influenza"
        );

        let created = MappingOutcome::ConceptCreated { concept_id: 12 };
        assert_eq!(
            created.message("Influenza"),
            "Diagnosis Influenza is created with Concept ID 12 "
        );
        assert_eq!(created.concept_id(), 12);
    }
}
