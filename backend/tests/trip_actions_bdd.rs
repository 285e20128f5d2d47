//! Behaviour-driven tests for trip mutations run end to end through the
//! trip action service with scripted provider, store, and scheduler ports.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use trip_backend::domain::ports::{
    RecommendationCandidate, RecommendationQuery, RecommendationRanking, RecommendationSource,
    RecommendationSourceError, TripActionCommand, TripActionDetails, TripActionOutcome,
    TripActionRequest, TripRepository, TripRepositoryError, TripScheduler, TripSchedulerError,
};
use trip_backend::domain::{
    Coordinates, DayLoad, Event, InterestCategory, ItineraryDay, Trip, TripActionError,
    TripActionService, TripActionServiceConfig, TripActionServicePorts, TripAttributes, TripId,
    UserId,
};
use trip_backend::outbound::memory::InMemoryTripRepository;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

fn candidate(name: &str) -> RecommendationCandidate {
    RecommendationCandidate {
        name: name.to_owned(),
        coordinates: Coordinates {
            latitude: 48.85,
            longitude: 2.35,
        },
        intro: String::new(),
        snippet: String::new(),
        images: Vec::new(),
        properties: Vec::new(),
        score: 7.0,
    }
}

/// Provider returning one unique and one shared name per category, and as
/// many popular events as the fallback asks for.
#[derive(Default)]
struct ScriptedSource {
    queries: Mutex<Vec<RecommendationQuery>>,
}

impl ScriptedSource {
    fn queries(&self) -> Vec<RecommendationQuery> {
        self.queries.lock().expect("queries mutex").clone()
    }
}

#[async_trait]
impl RecommendationSource for ScriptedSource {
    async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<RecommendationCandidate>, RecommendationSourceError> {
        self.queries
            .lock()
            .expect("queries mutex")
            .push(query.clone());
        let names: Vec<String> = match query.ranking {
            RecommendationRanking::Relevance => {
                vec![format!("{} pick", query.tag_labels), "Town Square".to_owned()]
            }
            RecommendationRanking::LocalPopularity => (0..query.max_results)
                .map(|index| format!("local favourite {index}"))
                .collect(),
        };
        Ok(names.iter().map(|name| candidate(name)).collect())
    }
}

/// In-memory store that counts every call it receives.
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryTripRepository,
    lookups: AtomicUsize,
    writes: AtomicUsize,
}

#[async_trait]
impl TripRepository for CountingRepository {
    async fn save(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save(trip).await
    }

    async fn find_by_id(&self, trip_id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(trip_id).await
    }

    async fn delete_by_id(&self, trip_id: &TripId) -> Result<(), TripRepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(trip_id).await
    }
}

/// Scheduler placing the whole pool on day one.
#[derive(Default)]
struct RecordingScheduler {
    pool_sizes: Mutex<Vec<usize>>,
}

#[async_trait]
impl TripScheduler for RecordingScheduler {
    async fn schedule(&self, events: Vec<Event>, mut trip: Trip) -> Result<Trip, TripSchedulerError> {
        self.pool_sizes
            .lock()
            .expect("scheduler mutex")
            .push(events.len());
        trip.itinerary = vec![ItineraryDay { day: 1, events }];
        Ok(trip)
    }
}

#[derive(Default, ScenarioState)]
struct TripActionsWorld {
    runtime: Slot<RuntimeHandle>,
    source: Slot<Arc<ScriptedSource>>,
    repository: Slot<Arc<CountingRepository>>,
    scheduler: Slot<Arc<RecordingScheduler>>,
    service: Slot<Arc<TripActionService>>,
    trip_payload: Slot<Value>,
    stored_pool: Slot<Vec<Event>>,
    last_result: Slot<Result<TripActionOutcome, TripActionError>>,
}

impl TripActionsWorld {
    fn runtime(&self) -> RuntimeHandle {
        self.runtime.get().expect("runtime should be set")
    }

    fn source(&self) -> Arc<ScriptedSource> {
        self.source.get().expect("source should be set")
    }

    fn repository(&self) -> Arc<CountingRepository> {
        self.repository.get().expect("repository should be set")
    }

    fn scheduler(&self) -> Arc<RecordingScheduler> {
        self.scheduler.get().expect("scheduler should be set")
    }

    fn invoke(&self, request: TripActionRequest) {
        let service = self.service.get().expect("service should be set");
        let result = self.runtime().0.block_on(service.invoke(request));
        self.last_result.set(result);
    }

    fn last_result(&self) -> Result<TripActionOutcome, TripActionError> {
        self.last_result.get().expect("an action should have run")
    }

    fn stored_trip(&self, trip_id: &str) -> Trip {
        let repository = self.repository();
        self.runtime()
            .0
            .block_on(repository.inner.find_by_id(&TripId::new(trip_id)))
            .expect("lookup succeeds")
            .expect("trip should be stored")
    }

    fn saved_trip(&self) -> Trip {
        match self.last_result().expect("action should succeed") {
            TripActionOutcome::Saved { trip } => trip,
            TripActionOutcome::Deleted { trip_id } => panic!("unexpected delete of {trip_id}"),
        }
    }

    fn queries(&self, ranking: RecommendationRanking) -> Vec<RecommendationQuery> {
        self.source()
            .queries()
            .into_iter()
            .filter(|query| query.ranking == ranking)
            .collect()
    }
}

#[fixture]
fn world() -> TripActionsWorld {
    TripActionsWorld::default()
}

#[given("a trip planner with scripted recommendations")]
fn a_trip_planner_with_scripted_recommendations(world: &TripActionsWorld) {
    let runtime = Runtime::new().expect("create runtime");
    let source = Arc::new(ScriptedSource::default());
    let repository = Arc::new(CountingRepository::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let service = TripActionService::new(
        TripActionServicePorts::new(source.clone(), repository.clone(), scheduler.clone()),
        TripActionServiceConfig::default(),
    );

    world.runtime.set(RuntimeHandle(Arc::new(runtime)));
    world.source.set(source);
    world.repository.set(repository);
    world.scheduler.set(scheduler);
    world.service.set(Arc::new(service));
}

#[given("a trip from \"{start}\" to \"{end}\" for food and culture at low load")]
fn a_trip_for_food_and_culture(world: &TripActionsWorld, start: String, end: String) {
    world.trip_payload.set(json!({
        "startDate": start,
        "endDate": end,
        "startLocation": "Paris",
        "endLocation": "Lyon",
        "categories": ["food", "culture"],
        "dayLoad": "LOW"
    }));
}

#[given("a stored trip \"{trip_id}\" owned by \"{owner}\" starting in \"{location}\"")]
fn a_stored_trip(world: &TripActionsWorld, trip_id: String, owner: String, location: String) {
    let mut trip = Trip::from_attributes(
        TripId::new(trip_id),
        UserId::new(owner),
        TripAttributes {
            start_date: "06/01/2024".to_owned(),
            end_date: "06/03/2024".to_owned(),
            start_location: location,
            end_location: "Lyon".to_owned(),
            categories: vec![InterestCategory::Food, InterestCategory::Culture],
            day_load: DayLoad::Low,
        },
    )
    .expect("valid stored trip");
    trip.events_pool = vec![
        Event::from_candidate(candidate("Halles Paul Bocuse"), InterestCategory::Food.into()),
        Event::from_candidate(candidate("Fourvière"), InterestCategory::Culture.into()),
    ];
    world.stored_pool.set(trip.events_pool.clone());

    let repository = world.repository();
    world
        .runtime()
        .0
        .block_on(repository.inner.save(&trip))
        .expect("seed trip");
}

#[when("the \"{action}\" action is invoked")]
fn the_action_is_invoked(world: &TripActionsWorld, action: String) {
    let payload = world.trip_payload.get().expect("trip payload should be set");
    world.invoke(TripActionRequest {
        action_type: action,
        element_id: None,
        invoked_by: UserId::new("traveller-1"),
        details: TripActionDetails {
            trip: Some(payload),
        },
    });
}

#[when("a \"{action}\" request targets trip \"{trip_id}\"")]
fn a_request_targets_trip(world: &TripActionsWorld, action: String, trip_id: String) {
    world.invoke(TripActionRequest {
        action_type: action,
        element_id: Some(TripId::new(trip_id)),
        invoked_by: UserId::new("traveller-1"),
        details: TripActionDetails::default(),
    });
}

#[when("the start location of trip \"{trip_id}\" is updated to \"{location}\"")]
fn the_start_location_is_updated(world: &TripActionsWorld, trip_id: String, location: String) {
    world.invoke(TripActionRequest {
        action_type: "UPDATE".to_owned(),
        element_id: Some(TripId::new(trip_id)),
        invoked_by: UserId::new("traveller-1"),
        details: TripActionDetails {
            trip: Some(json!({ "startLocation": location })),
        },
    });
}

#[then("each category query asks for {count:u32} results")]
fn each_category_query_asks_for(world: &TripActionsWorld, count: u32) {
    let queries = world.queries(RecommendationRanking::Relevance);
    assert_eq!(queries.len(), 2, "one query per category");
    assert!(
        queries.iter().all(|query| query.max_results == count),
        "category queries should request {count} results"
    );
}

#[then("the fallback query asks for {count:u32} results")]
fn the_fallback_query_asks_for(world: &TripActionsWorld, count: u32) {
    let queries = world.queries(RecommendationRanking::LocalPopularity);
    assert_eq!(queries.len(), 1, "exactly one fallback query");
    let fallback = queries.first().expect("fallback query");
    assert_eq!(fallback.max_results, count);
    assert_eq!(fallback.tag_labels, "character-Popular_with_locals");
}

#[then("the stored trip holds {count:usize} pooled events")]
fn the_stored_trip_holds_pooled_events(world: &TripActionsWorld, count: usize) {
    let trip = world.saved_trip();
    assert_eq!(trip.events_pool.len(), count);
    let stored = world.stored_trip(trip.trip_id.as_ref());
    assert_eq!(stored, trip, "returned trip should match the stored record");
}

#[then("the scheduler was not called")]
fn the_scheduler_was_not_called(world: &TripActionsWorld) {
    let calls = world.scheduler().pool_sizes.lock().expect("scheduler mutex").len();
    assert_eq!(calls, 0);
}

#[then("the scheduler received {count:usize} events")]
fn the_scheduler_received_events(world: &TripActionsWorld, count: usize) {
    let sizes = world
        .scheduler()
        .pool_sizes
        .lock()
        .expect("scheduler mutex")
        .clone();
    assert_eq!(sizes, vec![count]);
    let trip = world.saved_trip();
    let scheduled: usize = trip.itinerary.iter().map(|day| day.events.len()).sum();
    assert_eq!(scheduled, count);
}

#[then("the action fails with code \"{code}\"")]
fn the_action_fails_with_code(world: &TripActionsWorld, code: String) {
    let error = world.last_result().expect_err("action should fail");
    let rendered = serde_json::to_value(error.code()).expect("serialise code");
    assert_eq!(rendered, Value::String(code));
}

#[then("the repository performed {lookups:usize} lookup and no writes")]
fn the_repository_performed_lookups(world: &TripActionsWorld, lookups: usize) {
    let repository = world.repository();
    assert_eq!(repository.lookups.load(Ordering::SeqCst), lookups);
    assert_eq!(repository.writes.load(Ordering::SeqCst), 0);
}

#[then("the stored trip \"{trip_id}\" starts in \"{location}\"")]
fn the_stored_trip_starts_in(world: &TripActionsWorld, trip_id: String, location: String) {
    let trip = world.saved_trip();
    assert_eq!(trip.start_location, location);
    assert_eq!(world.stored_trip(&trip_id).start_location, location);
}

#[then("the stored trip \"{trip_id}\" is owned by \"{owner}\"")]
fn the_stored_trip_is_owned_by(world: &TripActionsWorld, trip_id: String, owner: String) {
    let stored = world.stored_trip(&trip_id);
    assert_eq!(stored.trip_id, TripId::new(trip_id));
    assert_eq!(stored.user_id, UserId::new(owner));
}

#[then("the stored trip \"{trip_id}\" keeps its event pool")]
fn the_stored_trip_keeps_its_event_pool(world: &TripActionsWorld, trip_id: String) {
    let expected = world.stored_pool.get().expect("seeded pool");
    assert_eq!(world.stored_trip(&trip_id).events_pool, expected);
}

#[then("no recommendation query was issued")]
fn no_recommendation_query_was_issued(world: &TripActionsWorld) {
    assert!(world.source().queries().is_empty());
}

#[scenario(
    path = "tests/features/trip_actions.feature",
    name = "Creating a trip stores a doubled event pool"
)]
fn creating_a_trip_stores_a_doubled_event_pool(world: TripActionsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/trip_actions.feature",
    name = "Regenerating a trip schedules an unscaled pool"
)]
fn regenerating_a_trip_schedules_an_unscaled_pool(world: TripActionsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/trip_actions.feature",
    name = "Deleting an unknown trip is not found"
)]
fn deleting_an_unknown_trip_is_not_found(world: TripActionsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/trip_actions.feature",
    name = "Updating the start location keeps the event pool"
)]
fn updating_the_start_location_keeps_the_event_pool(world: TripActionsWorld) {
    let _ = world;
}
