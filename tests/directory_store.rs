use anyhow::Result;
use chrono::{NaiveDate, Utc};
use entity::teammates;
use hub_tests::memory_store;
use platform_db::{SeaStore, migrate_down, pending_migrations, seed::seed_demo};
use platform_store::StoreError;
use products_directory::{
    Branch, Department, DirectoryStore, ListFilters, NewTag, NewTeammate, OnboardingStatus,
    Selector, TeammatePatch,
};
use sea_orm::{ActiveModelTrait, Set, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

fn new_teammate(first: &str, last: &str, department: Department, branch: Branch) -> NewTeammate {
    NewTeammate {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        phone: None,
        position: "Loan Officer".to_string(),
        department,
        branch,
        nmls: None,
        headshot_url: None,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 8),
        birthday: None,
        onboarding_status: OnboardingStatus::NotStarted,
        linkedin: None,
        calendly: None,
        manager_id: None,
    }
}

async fn add(store: &SeaStore, first: &str, last: &str, department: Department) -> Result<Uuid> {
    let record = DirectoryStore::create(
        store,
        new_teammate(first, last, department, Branch::PittsburghHq),
    )
    .await?;
    Ok(record.id)
}

#[tokio::test]
async fn list_orders_by_name_and_applies_filters() -> Result<()> {
    let store = memory_store().await?;
    add(&store, "Zoe", "Adams", Department::Sales).await?;
    add(&store, "Amy", "Young", Department::Operations).await?;
    add(&store, "Amy", "Baker", Department::Sales).await?;

    let all = store.list(ListFilters::default()).await?;
    let names: Vec<String> = all.iter().map(|mate| mate.full_name()).collect();
    assert_eq!(names, vec!["Amy Baker", "Amy Young", "Zoe Adams"]);

    let sales = store
        .list(ListFilters {
            department: Selector::Only(Department::Sales),
            ..ListFilters::default()
        })
        .await?;
    assert_eq!(sales.len(), 2);
    assert!(sales.iter().all(|mate| mate.department == Department::Sales));

    let savannah = store
        .list(ListFilters {
            branch: Selector::Only(Branch::Savannah),
            ..ListFilters::default()
        })
        .await?;
    assert!(savannah.is_empty());
    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive_and_spans_the_name_gap() -> Result<()> {
    let store = memory_store().await?;
    add(&store, "John", "Doe", Department::Sales).await?;
    add(&store, "Jane", "Smith", Department::Operations).await?;

    let by_last = store.search("DOE").await?;
    assert_eq!(by_last.len(), 1);
    assert_eq!(by_last[0].first_name, "John");

    let spanning = store.search("ohn do").await?;
    assert_eq!(spanning.len(), 1);
    assert_eq!(spanning[0].last_name, "Doe");

    let by_email = store.search("jane.smith@").await?;
    assert_eq!(by_email.len(), 1);

    assert_eq!(store.search("   ").await?.len(), 2);
    assert!(store.search("nobody").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn search_matches_the_whole_name_with_multi_word_first_names() -> Result<()> {
    let store = memory_store().await?;
    let mut mary = new_teammate("Mary Ann", "Smith", Department::Sales, Branch::Savannah);
    mary.email = "maryann.smith@example.com".into();
    DirectoryStore::create(&store, mary).await?;
    add(&store, "Mary", "Jones", Department::Operations).await?;

    let full = store.search("mary ann smith").await?;
    assert_eq!(full.len(), 1);
    assert_eq!(full[0].full_name(), "Mary Ann Smith");

    assert_eq!(store.search("ann smi").await?.len(), 1);
    assert_eq!(store.search("Mary").await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn list_ignores_case_when_ordering_names() -> Result<()> {
    let store = memory_store().await?;
    add(&store, "Zed", "Adams", Department::Sales).await?;
    add(&store, "anna", "Young", Department::Sales).await?;
    add(&store, "Bea", "xu", Department::Sales).await?;

    let names: Vec<String> = store
        .list(ListFilters::default())
        .await?
        .iter()
        .map(|mate| mate.full_name())
        .collect();
    assert_eq!(names, vec!["anna Young", "Bea xu", "Zed Adams"]);

    let searched: Vec<String> = store
        .search("a")
        .await?
        .iter()
        .map(|mate| mate.full_name())
        .collect();
    assert_eq!(searched, vec!["anna Young", "Bea xu", "Zed Adams"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_as_invalid_input() -> Result<()> {
    let store = memory_store().await?;
    add(&store, "John", "Doe", Department::Sales).await?;
    let err = DirectoryStore::create(
        &store,
        new_teammate("John", "Doe", Department::Operations, Branch::Savannah),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn managers_must_be_other_existing_teammates() -> Result<()> {
    let store = memory_store().await?;
    let lead = add(&store, "Dana", "Whitfield", Department::Leadership).await?;

    let mut orphan = new_teammate("John", "Doe", Department::Sales, Branch::PittsburghHq);
    orphan.manager_id = Some(Uuid::new_v4());
    let err = DirectoryStore::create(&store, orphan).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::InvalidInput("Manager must reference an existing teammate".into())
    );

    let own = store
        .update(
            lead,
            TeammatePatch {
                manager_id: Some(Some(lead)),
                ..TeammatePatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        own,
        StoreError::InvalidInput("A teammate cannot be their own manager".into())
    );
    Ok(())
}

#[tokio::test]
async fn update_applies_patch_and_clears_optional_fields() -> Result<()> {
    let store = memory_store().await?;
    let lead = add(&store, "Dana", "Whitfield", Department::Leadership).await?;
    let mut new = new_teammate("John", "Doe", Department::Sales, Branch::PittsburghHq);
    new.phone = Some("412-555-0100".into());
    let john = DirectoryStore::create(&store, new).await?;

    let updated = store
        .update(
            john.id,
            TeammatePatch {
                position: Some("Branch Manager".into()),
                phone: Some(None),
                manager_id: Some(Some(lead)),
                onboarding_status: Some(OnboardingStatus::Done),
                ..TeammatePatch::default()
            },
        )
        .await?;
    assert_eq!(updated.position, "Branch Manager");
    assert_eq!(updated.phone, None);
    assert_eq!(updated.manager_id, Some(lead));
    assert_eq!(updated.onboarding_status, OnboardingStatus::Done);
    assert_eq!(updated.first_name, "John");

    let missing = store
        .update(Uuid::new_v4(), TeammatePatch::default())
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
    Ok(())
}

#[tokio::test]
async fn delete_releases_reports_and_drops_tags() -> Result<()> {
    let store = memory_store().await?;
    let lead = add(&store, "Dana", "Whitfield", Department::Leadership).await?;
    let mut new = new_teammate("John", "Doe", Department::Sales, Branch::PittsburghHq);
    new.manager_id = Some(lead);
    let john = DirectoryStore::create(&store, new).await?;
    store.add_tags(lead, vec![NewTag::named("Leadership Team")]).await?;

    DirectoryStore::delete(&store, lead).await?;

    let remaining = store.list(ListFilters::default()).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, john.id);
    assert_eq!(remaining[0].manager_id, None);

    let again = DirectoryStore::delete(&store, lead).await.unwrap_err();
    assert!(again.is_not_found());
    Ok(())
}

#[tokio::test]
async fn tags_are_deduplicated_and_removable() -> Result<()> {
    let store = memory_store().await?;
    let id = add(&store, "John", "Doe", Department::Sales).await?;

    let tagged = store
        .add_tags(
            id,
            vec![
                NewTag::named("Spanish"),
                NewTag::named(" Spanish "),
                NewTag::named("Top Producer"),
            ],
        )
        .await?;
    assert_eq!(tagged.tags.len(), 2);
    assert!(tagged.tags.contains(&"Spanish".to_string()));

    let blank = store.add_tags(id, vec![NewTag::named("  ")]).await.unwrap_err();
    assert_eq!(blank, StoreError::InvalidInput("Tag name is required".into()));

    let trimmed = store.remove_tag(id, "Spanish").await?;
    assert_eq!(trimmed.tags, vec!["Top Producer".to_string()]);
    Ok(())
}

#[tokio::test]
async fn headshot_url_can_be_set_and_cleared() -> Result<()> {
    let store = memory_store().await?;
    let id = add(&store, "John", "Doe", Department::Sales).await?;
    let url = "http://hub.test/files/headshots/john.png".to_string();

    let with = store.set_headshot(id, Some(url.clone())).await?;
    assert_eq!(with.headshot_url, Some(url));
    let without = store.set_headshot(id, None).await?;
    assert_eq!(without.headshot_url, None);

    let missing = store.set_headshot(Uuid::new_v4(), None).await.unwrap_err();
    assert!(missing.is_not_found());
    Ok(())
}

#[tokio::test]
async fn unknown_stored_department_is_an_integrity_error() -> Result<()> {
    let store = memory_store().await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    teammates::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set("Lex".into()),
        last_name: Set("Counsel".into()),
        email: Set("lex@example.com".into()),
        phone: Set(None),
        position: Set("General Counsel".into()),
        department: Set("Legal".into()),
        branch: Set(Branch::PittsburghHq.as_str().into()),
        nmls: Set(None),
        headshot_url: Set(None),
        start_date: Set(None),
        birthday: Set(None),
        onboarding_status: Set(OnboardingStatus::Done.as_str().into()),
        linkedin: Set(None),
        calendly: Set(None),
        manager_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(store.connection())
    .await?;

    let err = store.list(ListFilters::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::Integrity(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn demo_seed_builds_profiles_and_runs_once() -> Result<()> {
    let store = memory_store().await?;
    let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

    let first = seed_demo(&store, today).await?;
    assert!(!first.skipped);
    assert!(first.events > 0);
    let lead = &first.teammates[0];
    let producer = &first.teammates[1];

    let profile = store.get_profile(producer.id).await?;
    assert_eq!(profile.teammate.full_name(), "John Doe");
    let manager = profile.manager.as_ref().unwrap();
    assert_eq!(manager.id, lead.id);
    assert_eq!(manager.full_name, "Dana Whitfield");
    assert_eq!(profile.tags.len(), 2);
    assert_eq!(profile.licenses.len(), 1);
    assert_eq!(profile.licenses[0].state_code, "PA");
    assert_eq!(profile.reviews.len(), 2);
    assert_eq!(profile.average_rating(), Some(4.5));

    let lead_profile = store.get_profile(lead.id).await?;
    assert!(lead_profile.manager.is_none());

    let second = seed_demo(&store, today).await?;
    assert!(second.skipped);
    assert!(second.teammates.is_empty());
    assert_eq!(
        store.list(ListFilters::default()).await?.len(),
        first.teammates.len()
    );
    Ok(())
}

#[tokio::test]
async fn migrations_roll_back_cleanly() -> Result<()> {
    let store = memory_store().await?;
    let db = store.connection();
    assert_eq!(pending_migrations(db).await?, 0);

    migrate_down(db, None).await?;
    assert_eq!(pending_migrations(db).await?, 3);
    Ok(())
}
