//! The create/read/update/delete walkthrough.
//!
//! Ten fixed steps, one per kind of model operation. Each step is awaited on its
//! own and its outcome logged; a failed step never stops the ones after it.

use std::fmt;

use kennel::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::DocumentExt,
    error::DocumentStoreResult,
    query::Filter,
    store::DocumentStore,
    update::Update,
};
use tracing::{debug, info, warn};

use crate::model::{Dog, fields};

pub const DEFAULT_TARGET_ID: &str = "5c5310238118fd8446555924";
pub const DEFAULT_DOOMED_ID: &str = "5c531b37975732853ec337b8";

/// Ids the script addresses directly. Kept textual so a malformed id surfaces
/// as a failed step instead of a startup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptIds {
    /// Looked up, renamed and given a toy.
    pub target: String,
    /// Deleted.
    pub doomed: String,
}

impl Default for ScriptIds {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_ID.to_string(),
            doomed: DEFAULT_DOOMED_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    BulkInsert,
    ConstructAndSave,
    ListYoung,
    FindOneNotKoda,
    FindById,
    RenameById,
    BirthdayForMojos,
    PushToy,
    DeleteById,
    DeleteNewbies,
}

impl Step {
    pub const ALL: [Step; 10] = [
        Step::BulkInsert,
        Step::ConstructAndSave,
        Step::ListYoung,
        Step::FindOneNotKoda,
        Step::FindById,
        Step::RenameById,
        Step::BirthdayForMojos,
        Step::PushToy,
        Step::DeleteById,
        Step::DeleteNewbies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Step::BulkInsert => "bulk insert Koda",
            Step::ConstructAndSave => "construct and save Mojo",
            Step::ListYoung => "list dogs younger than 2",
            Step::FindOneNotKoda => "find one dog not named Koda",
            Step::FindById => "find target by id",
            Step::RenameById => "rename target to Milo, age 7",
            Step::BirthdayForMojos => "make every Mojo a year older",
            Step::PushToy => "give target a Rope Toy",
            Step::DeleteById => "delete doomed dog by id",
            Step::DeleteNewbies => "delete every Newbie",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(String),
    /// The step ran but its id or filter matched nothing.
    NothingFound(String),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub outcome: Outcome,
}

fn found(dog: Option<Dog>, describe: impl FnOnce(&Dog) -> String, missing: &str) -> Outcome {
    match dog {
        Some(dog) => {
            match dog.to_json() {
                Ok(json) => debug!(%json, "matched document"),
                Err(error) => warn!(%error, "could not render document"),
            }

            Outcome::Succeeded(describe(&dog))
        }
        None => Outcome::NothingFound(missing.to_string()),
    }
}

async fn run_step<B: StoreBackend>(
    dogs: &TypedCollection<'_, B, Dog>,
    step: Step,
    ids: &ScriptIds,
) -> DocumentStoreResult<Outcome> {
    Ok(match step {
        Step::BulkInsert => {
            let koda = Dog::builder("Koda").age(3).build()?;
            let created = dogs.insert_many(vec![koda]).await?;
            let names = created
                .iter()
                .map(Dog::to_string)
                .collect::<Vec<_>>();

            Outcome::Succeeded(format!("created {}", names.join(", ")))
        }
        Step::ConstructAndSave => {
            let mojo = Dog::builder("Mojo").age(1).build()?;
            let saved = dogs.save(mojo).await?;

            Outcome::Succeeded(format!("created {saved}"))
        }
        Step::ListYoung => {
            let young = dogs.find(Filter::lt(fields::AGE, 2)).await?;
            let names = young
                .iter()
                .map(Dog::to_string)
                .collect::<Vec<_>>();

            Outcome::Succeeded(format!("found {} dog(s): {}", young.len(), names.join(", ")))
        }
        Step::FindOneNotKoda => found(
            dogs.find_one(Filter::ne(fields::NAME, "Koda")).await?,
            |dog| format!("found {dog}"),
            "every dog is named Koda",
        ),
        Step::FindById => found(
            dogs.find_by_id(&ids.target).await?,
            |dog| format!("found {dog}"),
            "no dog has the target id",
        ),
        Step::RenameById => found(
            dogs
                .find_by_id_and_update(&ids.target, Update::new().set(fields::NAME, "Milo").set(fields::AGE, 7))
                .await?,
            |dog| format!("updated {dog}"),
            "no dog has the target id",
        ),
        Step::BirthdayForMojos => {
            let result = dogs
                .update_many(Filter::eq(fields::NAME, "Mojo"), Update::new().inc(fields::AGE, 1))
                .await?;

            Outcome::Succeeded(format!(
                "matched {}, aged {}",
                result.matched_count, result.modified_count
            ))
        }
        Step::PushToy => found(
            dogs
                .find_by_id_and_update(&ids.target, Update::new().push(fields::TOYS, "Rope Toy"))
                .await?,
            |dog| format!("{dog} now has {} toy(s)", dog.toys.len()),
            "no dog has the target id",
        ),
        Step::DeleteById => found(
            dogs.delete_by_id(&ids.doomed).await?,
            |dog| format!("deleted {dog}"),
            "couldn't find anything to delete",
        ),
        Step::DeleteNewbies => {
            let result = dogs.delete_many(Filter::eq(fields::NAME, "Newbie")).await?;

            Outcome::Succeeded(format!("deleted {}", result.deleted_count))
        }
    })
}

/// Runs every step in order and returns one report per step.
///
/// With `reset`, the `dogs` collection is dropped first.
pub async fn run<B: StoreBackend>(
    store: &DocumentStore<B>,
    ids: &ScriptIds,
    reset: bool,
) -> Vec<StepReport> {
    let dogs = store.typed_collection::<Dog>();

    if reset {
        match dogs.drop().await {
            Ok(()) => info!(collection = dogs.name(), "dropped collection"),
            Err(error) => warn!(%error, collection = dogs.name(), "could not drop collection"),
        }
    }

    let mut reports = Vec::with_capacity(Step::ALL.len());

    for step in Step::ALL {
        let outcome = run_step(&dogs, step, ids)
            .await
            .unwrap_or_else(|error| Outcome::Failed(error.to_string()));

        match &outcome {
            Outcome::Succeeded(message) => info!(%step, "{message}"),
            Outcome::NothingFound(message) => info!(%step, "{message}"),
            Outcome::Failed(message) => warn!(%step, "failed: {message}"),
        }

        reports.push(StepReport { step, outcome });
    }

    reports
}
