use bson::{DateTime, oid::ObjectId};
use dog_amazon::model::{Dog, fields};
use kennel::{
    document::{Document, DocumentExt},
    memory::InMemoryStore,
    query::Filter,
    store::DocumentStore,
    update::Update,
};

fn store() -> DocumentStore<InMemoryStore> {
    DocumentStore::new(InMemoryStore::new())
}

#[test]
fn age_bounds_are_inclusive() {
    for age in [0, 50] {
        assert!(Dog::builder("Koda").age(age).build().is_ok(), "age {age} should pass");
    }
    for age in [-1, 51] {
        let errors = Dog::builder("Koda").age(age).build().unwrap_err();
        assert!(errors.has_field(fields::AGE), "age {age} should fail");
    }
}

#[test]
fn non_finite_ages_are_rejected() {
    for age in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let errors = Dog::builder("Koda").age(age).build().unwrap_err();
        assert!(errors.has_field(fields::AGE), "age {age} should fail");
    }
}

#[test]
fn toy_length_counts_utf16_code_units() {
    assert!(Dog::builder("Koda").toy("🐕").build().is_ok());
    assert!(Dog::builder("Koda").color("🐕🐕").build().is_ok());
}

#[test]
fn country_must_be_two_uppercase_letters() {
    assert!(Dog::builder("Koda").country("US").build().is_ok());

    for country in ["us", "USA", "U", "U1"] {
        let errors = Dog::builder("Koda").country(country).build().unwrap_err();
        assert!(errors.has_field(fields::COUNTRY), "{country} should fail");
    }
}

#[test]
fn photo_url_must_be_http() {
    for url in ["http://example.com/koda.jpg", "https://example.com/koda.jpg"] {
        assert!(Dog::builder("Koda").photo_url(url).build().is_ok());
    }
    for url in ["ftp://example.com/koda.jpg", "example.com/koda.jpg", "HTTP://example.com"] {
        let errors = Dog::builder("Koda").photo_url(url).build().unwrap_err();
        assert!(errors.has_field(fields::PHOTO_URL), "{url} should fail");
    }
}

#[test]
fn every_violation_is_reported() {
    let errors = Dog::builder("")
        .color("re")
        .toy("Ball")
        .toy("x")
        .build()
        .unwrap_err();

    assert!(errors.has_field(fields::NAME));
    assert!(errors.has_field(fields::COLOR));
    assert!(errors.has_field("toys.1"));
    assert_eq!(errors.errors().len(), 3);
}

#[test]
fn stored_field_names() {
    let dog = Dog::builder("Koda")
        .age(3)
        .photo_url("https://example.com/koda.jpg")
        .vet_visit(DateTime::now())
        .build()
        .unwrap();

    let stored = dog.to_bson().unwrap();
    let stored = stored.as_document().unwrap();

    assert_eq!(stored.get_str(fields::NAME).unwrap(), "Koda");
    assert_eq!(stored.get_str(fields::PHOTO_URL).unwrap(), "https://example.com/koda.jpg");
    assert!(stored.get_array(fields::VET_VISITS).is_ok());
    assert!(!stored.contains_key(fields::ID));
    assert!(!stored.contains_key(fields::COLOR));
}

#[tokio::test]
async fn create_then_find_by_id_round_trips() {
    let store = store();
    let dogs = store.typed_collection::<Dog>();

    let submitted = Dog::builder("Koda")
        .age(3)
        .color("brown")
        .vet_visit(DateTime::from_millis(1_548_979_200_000))
        .toy("Ball")
        .owner(ObjectId::new())
        .country("US")
        .photo_url("https://example.com/koda.jpg")
        .build()
        .unwrap();

    let created = dogs.create(submitted.clone()).await.unwrap();
    let id = *created.id().unwrap();

    let found = dogs.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(found, Dog { id: Some(id), ..submitted });
}

#[tokio::test]
async fn invalid_dogs_are_not_persisted() {
    let store = store();
    let dogs = store.typed_collection::<Dog>();

    let mut dog = Dog::builder("Koda").build().unwrap();
    dog.age = Some(51.0);

    assert!(dogs.create(dog).await.unwrap_err().is_validation());
    assert!(dogs.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_unknown_id_removes_nothing() {
    let store = store();
    let dogs = store.typed_collection::<Dog>();

    assert_eq!(dogs.delete_by_id(ObjectId::new()).await.unwrap(), None);
    assert_eq!(dogs.delete_by_id("5c531b37975732853ec337b8").await.unwrap(), None);
}

#[tokio::test]
async fn listing_older_than_zero_excludes_newborns() {
    let store = store();
    let dogs = store.typed_collection::<Dog>();

    dogs.insert_many(vec![
        Dog::builder("Newborn").age(0).build().unwrap(),
        Dog::builder("Mojo").age(1).build().unwrap(),
        Dog::builder("Ageless").build().unwrap(),
    ])
    .await
    .unwrap();

    let names = dogs
        .find(Filter::gt(fields::AGE, 0))
        .await
        .unwrap()
        .into_iter()
        .map(|dog| dog.name)
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["Mojo".to_string()]);
}

#[tokio::test]
async fn updates_cannot_store_a_non_finite_age() {
    let store = store();
    let dogs = store.typed_collection::<Dog>();

    let koda = dogs.create(Dog::builder("Koda").age(3).build().unwrap()).await.unwrap();
    let id = *koda.id().unwrap();

    let err = dogs
        .update_by_id(id, Update::new().set(fields::AGE, f64::NAN))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let stored = dogs.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.age, Some(3.0));
}

#[tokio::test]
async fn updates_breaking_a_dog_constraint_change_nothing() {
    let store = store();
    let dogs = store.typed_collection::<Dog>();

    dogs.insert_many(vec![
        Dog::builder("Mojo").age(1).build().unwrap(),
        Dog::builder("Mojo").age(45).build().unwrap(),
    ])
    .await
    .unwrap();

    let err = dogs
        .update_many(Filter::eq(fields::NAME, "Mojo"), Update::new().inc(fields::AGE, 10))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let mut ages = dogs
        .find(Filter::eq(fields::NAME, "Mojo"))
        .await
        .unwrap()
        .into_iter()
        .filter_map(|dog| dog.age)
        .collect::<Vec<_>>();
    ages.sort_by(f64::total_cmp);
    assert_eq!(ages, vec![1.0, 45.0]);

    let err = dogs
        .update_many(Filter::eq(fields::NAME, "Mojo"), Update::new().set(fields::COUNTRY, "usa"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(dogs.find(Filter::eq(fields::COUNTRY, "usa")).await.unwrap().is_empty());
}
