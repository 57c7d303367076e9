//! PersonStore: one-shot operations on the people collection
//!
//! ## Design
//!
//! PersonStore is a stateless facade over a schema-checked `Collection`.
//! Each method performs exactly one store operation and returns the store's
//! error unchanged on failure.
//!
//! ## Thread Safety
//!
//! PersonStore is `Send + Sync` and cheap to clone. Concurrent mutations of
//! the same person are serialized by the store; the last write wins.

use crate::model::{person_schema, NewPerson, Person, COLLECTION};
use crate::samples::sample_person;
use folio_core::{DocId, Error, Result};
use folio_engine::query::{Filter, Projection, SortOrder, Update};
use folio_engine::{Collection, Database, DeleteResult, ReturnDocument};
use std::sync::Arc;
use tracing::{debug, info};

/// Food appended by [`PersonStore::find_edit_then_save`]
pub const FOOD_TO_ADD: &str = "hamburger";

/// Age written by [`PersonStore::find_and_update`]
pub const AGE_TO_SET: i64 = 20;

/// Name removed by [`PersonStore::remove_many_people`]
pub const NAME_TO_REMOVE: &str = "Mary";

/// Food matched by [`PersonStore::query_chain`]
pub const FOOD_TO_SEARCH: &str = "burrito";

/// Result cap of [`PersonStore::query_chain`]
pub const QUERY_LIMIT: usize = 2;

/// Operations on the people collection
///
/// # Example
///
/// ```ignore
/// let db = Database::connect("memory://")?;
/// let store = PersonStore::new(&db);
///
/// let juan = store.create_and_save_person()?;
/// let found = store.find_person_by_id(&juan.id)?;
/// ```
#[derive(Debug, Clone)]
pub struct PersonStore {
    people: Collection,
}

impl PersonStore {
    /// Bind to the people collection of `db`
    pub fn new(db: &Arc<Database>) -> Self {
        Self {
            people: db.collection_with_schema(COLLECTION, person_schema()),
        }
    }

    /// The underlying collection
    pub fn collection(&self) -> &Collection {
        &self.people
    }

    /// Insert the fixed sample person (Juan Pérez, 30, Pizza and Tacos)
    pub fn create_and_save_person(&self) -> Result<Person> {
        let stored = self.people.insert_one(sample_person().to_document()?)?;
        let person = Person::from_document(stored)?;
        debug!(id = %person.id, name = %person.name, "Saved person");
        Ok(person)
    }

    /// Insert a batch; nothing is stored if any person is rejected
    pub fn create_many_people(&self, people: Vec<NewPerson>) -> Result<Vec<Person>> {
        let docs = people
            .iter()
            .map(NewPerson::to_document)
            .collect::<Result<Vec<_>>>()?;
        self.people
            .insert_many(docs)?
            .into_iter()
            .map(Person::from_document)
            .collect()
    }

    /// Everyone with exactly this name, in natural order
    pub fn find_people_by_name(&self, name: &str) -> Result<Vec<Person>> {
        self.people
            .find(&Filter::eq("name", name))?
            .into_iter()
            .map(Person::from_document)
            .collect()
    }

    /// First person, in natural order, who lists `food` as a favorite
    pub fn find_one_by_food(&self, food: &str) -> Result<Option<Person>> {
        self.people
            .find_one(&Filter::eq("favoriteFoods", food))?
            .map(Person::from_document)
            .transpose()
    }

    /// Person with this id
    pub fn find_person_by_id(&self, id: &DocId) -> Result<Option<Person>> {
        self.people
            .find_by_id(id)?
            .map(Person::from_document)
            .transpose()
    }

    /// Load a person, append `"hamburger"` to their favorite foods, save
    ///
    /// # Errors
    /// `Error::DocumentNotFound` if no person has this id.
    pub fn find_edit_then_save(&self, id: &DocId) -> Result<Person> {
        let mut person = self
            .find_person_by_id(id)?
            .ok_or(Error::DocumentNotFound(*id))?;
        person.favorite_foods.push(FOOD_TO_ADD.to_string());

        let saved = self.people.save(person.to_document()?)?;
        Person::from_document(saved)
    }

    /// Set the age of the first person with this name to 20
    ///
    /// Returns the updated person, or `None` if nobody has the name.
    pub fn find_and_update(&self, name: &str) -> Result<Option<Person>> {
        self.people
            .find_one_and_update(
                &Filter::eq("name", name),
                &Update::new().set("age", AGE_TO_SET),
                ReturnDocument::After,
            )?
            .map(Person::from_document)
            .transpose()
    }

    /// Remove the person with this id, returning them
    pub fn remove_by_id(&self, id: &DocId) -> Result<Option<Person>> {
        self.people
            .find_by_id_and_remove(id)?
            .map(Person::from_document)
            .transpose()
    }

    /// Remove everyone named Mary
    pub fn remove_many_people(&self) -> Result<DeleteResult> {
        let result = self.people.delete_many(&Filter::eq("name", NAME_TO_REMOVE))?;
        debug!(deleted = result.deleted_count, "Removed people named {}", NAME_TO_REMOVE);
        Ok(result)
    }

    /// Up to two burrito lovers, sorted by name, without their age
    pub fn query_chain(&self) -> Result<Vec<Person>> {
        let docs = self
            .people
            .query(Filter::eq("favoriteFoods", FOOD_TO_SEARCH))
            .sort("name", SortOrder::Ascending)
            .limit(QUERY_LIMIT)
            .select(Projection::exclude(["age"]))
            .exec()?;

        if docs.is_empty() {
            info!(food = FOOD_TO_SEARCH, "No people found");
        } else {
            info!(food = FOOD_TO_SEARCH, count = docs.len(), "People found");
        }
        docs.into_iter().map(Person::from_document).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PersonStore>();
    }

    #[test]
    fn test_handles_share_data() {
        let db = Database::ephemeral();
        let a = PersonStore::new(&db);
        let b = PersonStore::new(&db);
        let juan = a.create_and_save_person().unwrap();
        assert_eq!(b.find_person_by_id(&juan.id).unwrap(), Some(juan));
    }

    #[test]
    fn test_sample_person_values() {
        let db = Database::ephemeral();
        let juan = PersonStore::new(&db).create_and_save_person().unwrap();
        assert_eq!(juan.name, "Juan Pérez");
        assert_eq!(juan.age, Some(30));
        assert_eq!(juan.favorite_foods, vec!["Pizza", "Tacos"]);
    }
}
