use anyhow::Result;
use pale_grind_lib::gateway::{parse_error_message, parse_generate_response};
use pale_grind_lib::{
    completion_percentage, format_clock, parse_color, tip_prompt, AppService, Catalog,
    CatalogError, ClockStatus, Config, ConfigError, Difficulty, Exercise, ExerciseKey,
    GatewayError, Reps, RestClock, Section, SessionSettings, StandardColor, TextGenerator, Ticker,
    TipFailure, TipState, WorkoutClock, WorkoutSession,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// Gateway that replays canned answers and counts calls
struct ScriptedGateway {
    answers: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    fn new(answers: Vec<Result<String, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for ScriptedGateway {
    fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResponse))
    }
}

fn api_error(status: u16, message: &str) -> GatewayError {
    GatewayError::Api {
        status,
        message: message.to_string(),
    }
}

fn exercise(name: &str, sets: u32) -> Exercise {
    Exercise {
        name: name.to_string(),
        sets,
        reps: Reps::Count(10),
        weight: "50lbs".to_string(),
        difficulty: Difficulty::Medium,
    }
}

fn section(id: &str, exercises: Vec<Exercise>) -> Section {
    Section {
        id: id.to_string(),
        title: id.to_uppercase(),
        icon: "*".to_string(),
        color: "Cyan".to_string(),
        exercises,
    }
}

// Small two-section catalog: three exercises in total
fn small_catalog() -> Catalog {
    Catalog::new(vec![
        section("push", vec![exercise("Squat", 3), exercise("Bench Press", 4)]),
        section("pull", vec![exercise("Deadlift", 2)]),
    ])
    .expect("valid catalog")
}

fn create_test_session(catalog: Catalog) -> WorkoutSession {
    WorkoutSession::new(Arc::new(catalog), SessionSettings::default()).with_tips_available(true)
}

fn create_test_service(gateway: Option<Arc<dyn TextGenerator>>) -> AppService {
    AppService::from_parts(
        Config::default(),
        "test_config.toml".into(),
        small_catalog(),
        gateway,
    )
}

fn temp_path(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    std::env::temp_dir().join(format!(
        "pale-grind-test-{}-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst),
        name
    ))
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

// --- Completion tracker ---

#[test]
fn test_completion_percentage_matches_rounded_ratio() -> Result<()> {
    let catalog = Catalog::builtin();
    let total = catalog.total_exercises();
    let keys: Vec<ExerciseKey> = catalog.keys().collect();
    let mut session = create_test_session(catalog);
    let t0 = Instant::now();

    for (k, key) in keys.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = (100.0 * k as f64 / total as f64).round() as u8;
        assert_eq!(session.completion_percentage(), expected, "after {k} completions");
        session.toggle_complete(key, t0)?;
    }
    assert_eq!(session.completion_percentage(), 100);
    Ok(())
}

#[test]
fn test_completion_percentage_edge_values() {
    assert_eq!(completion_percentage(0, 0), 0);
    assert_eq!(completion_percentage(5, 0), 0);
    assert_eq!(completion_percentage(1, 8), 13); // 12.5 rounds up
    assert_eq!(completion_percentage(1, 3), 33);
    assert_eq!(completion_percentage(2, 3), 67);
    assert_eq!(completion_percentage(3, 3), 100);
}

#[test]
fn test_empty_catalog_reports_zero_progress() -> Result<()> {
    let session = create_test_session(Catalog::new(vec![section("empty", vec![])])?);
    assert_eq!(session.completion_percentage(), 0);
    let stats = session.stats();
    assert_eq!(stats.total, 0);
    assert!(!stats.workout_complete);
    assert!(!session.is_celebrating());
    Ok(())
}

#[test]
fn test_double_toggle_restores_state_without_new_rest() -> Result<()> {
    let mut session = create_test_session(small_catalog());
    let key = ExerciseKey::new("push", 0);
    let t0 = Instant::now();

    assert!(session.toggle_complete(&key, t0)?);
    assert!(session.is_complete(&key));
    assert!(session.rest_clock().is_active());
    assert_eq!(session.rest_clock().remaining_seconds(), 90);

    // Let the completion rest run out
    session.poll(t0 + secs(90));
    assert!(!session.rest_clock().is_active());

    assert!(!session.toggle_complete(&key, t0 + secs(91))?);
    assert!(!session.is_complete(&key));
    assert_eq!(session.completed_count(), 0);
    assert!(!session.rest_clock().is_active());
    Ok(())
}

#[test]
fn test_toggle_unknown_exercise_is_an_error() {
    let mut session = create_test_session(small_catalog());
    let result = session.toggle_complete(&ExerciseKey::new("legs", 0), Instant::now());
    assert!(matches!(result, Err(CatalogError::UnknownExercise(_))));

    let result = session.toggle_complete(&ExerciseKey::new("pull", 7), Instant::now());
    assert!(result.is_err());
    assert_eq!(session.completed_count(), 0);
}

#[test]
fn test_celebration_shows_for_exactly_the_window() -> Result<()> {
    let catalog = small_catalog();
    let keys: Vec<ExerciseKey> = catalog.keys().collect();
    let mut session = create_test_session(catalog);
    let t0 = Instant::now();

    for key in &keys[..keys.len() - 1] {
        session.toggle_complete(key, t0)?;
        assert!(!session.is_celebrating());
    }

    let done_at = t0 + secs(10);
    session.toggle_complete(&keys[keys.len() - 1], done_at)?;
    assert!(session.is_celebrating());
    assert!(session.stats().workout_complete);

    session.poll(done_at + Duration::from_millis(4499));
    assert!(session.is_celebrating());
    session.poll(done_at + Duration::from_millis(4500));
    assert!(!session.is_celebrating());
    Ok(())
}

#[test]
fn test_celebration_retrigger_keeps_first_hide() -> Result<()> {
    let catalog = small_catalog();
    let keys: Vec<ExerciseKey> = catalog.keys().collect();
    let mut session = create_test_session(catalog);
    let t0 = Instant::now();

    for key in &keys {
        session.toggle_complete(key, t0)?;
    }
    assert!(session.is_celebrating());

    // Un-complete and re-complete one exercise two seconds later
    session.toggle_complete(&keys[0], t0 + secs(2))?;
    assert!(session.is_celebrating());
    session.toggle_complete(&keys[0], t0 + secs(2))?;

    assert!(session.is_celebrating());

    // The hide scheduled by the first trigger still fires
    session.poll(t0 + Duration::from_millis(4499));
    assert!(session.is_celebrating());
    session.poll(t0 + Duration::from_millis(4600));
    assert!(!session.is_celebrating());
    Ok(())
}

#[test]
fn test_celebration_stale_hide_cuts_later_trigger_short() -> Result<()> {
    let catalog = small_catalog();
    let keys: Vec<ExerciseKey> = catalog.keys().collect();
    let mut session = create_test_session(catalog);
    let t0 = Instant::now();

    for key in &keys {
        session.toggle_complete(key, t0)?;
    }
    // Second trigger at t0+2s schedules a hide at t0+6.5s
    session.toggle_complete(&keys[0], t0 + secs(2))?;
    session.toggle_complete(&keys[0], t0 + secs(2))?;
    session.poll(t0 + Duration::from_millis(4500));
    assert!(!session.is_celebrating());

    // Third trigger at t0+5s is hidden by the t0+6.5s hide, not its own
    session.toggle_complete(&keys[0], t0 + secs(5))?;
    session.toggle_complete(&keys[0], t0 + secs(5))?;
    assert!(session.is_celebrating());
    session.poll(t0 + Duration::from_millis(6500));
    assert!(!session.is_celebrating());

    // The third trigger's own hide is still pending and harmless
    session.poll(t0 + Duration::from_millis(9500));
    assert!(!session.is_celebrating());
    Ok(())
}

// --- Set cursor ---

#[test]
fn test_set_cursor_defaults_and_clamps() -> Result<()> {
    let mut session = create_test_session(small_catalog());
    let key = ExerciseKey::new("pull", 0); // Deadlift, 2 sets

    assert_eq!(session.current_set(&key), 1);
    assert_eq!(session.previous_set(&key)?, 1);
    assert_eq!(session.next_set(&key)?, 2);
    assert_eq!(session.next_set(&key)?, 2);
    assert_eq!(session.previous_set(&key)?, 1);

    // Direct writes are stored as given
    session.set_current_set(&key, 9);
    assert_eq!(session.current_set(&key), 9);
    assert_eq!(session.next_set(&key)?, 2);

    // Completing an exercise leaves its cursor alone
    session.set_current_set(&key, 2);
    session.toggle_complete(&key, Instant::now())?;
    assert_eq!(session.current_set(&key), 2);
    Ok(())
}

// --- Clocks ---

#[test]
fn test_ticker_counts_missed_periods() {
    let t0 = Instant::now();
    let mut ticker = Ticker::default();
    assert_eq!(ticker.poll(t0 + secs(5)), 0);

    ticker.arm(t0);
    assert_eq!(ticker.poll(t0 + Duration::from_millis(999)), 0);
    assert_eq!(ticker.poll(t0 + secs(1)), 1);
    assert_eq!(ticker.poll(t0 + Duration::from_millis(4500)), 3);

    // Re-arming keeps the existing schedule
    ticker.arm(t0 + Duration::from_millis(4600));
    assert_eq!(ticker.poll(t0 + Duration::from_millis(4999)), 0);
    assert_eq!(ticker.poll(t0 + secs(5)), 1);

    ticker.cancel();
    assert!(!ticker.is_armed());
    assert_eq!(ticker.poll(t0 + secs(60)), 0);
}

#[test]
fn test_workout_clock_only_counts_running_time() {
    let mut clock = WorkoutClock::default();
    assert_eq!(clock.status(), ClockStatus::NotStarted);

    // Ticks before the start are ignored
    clock.tick();
    assert_eq!(clock.elapsed_seconds(), 0);

    let t0 = Instant::now();
    clock.start(t0);
    assert_eq!(clock.status(), ClockStatus::Running);
    clock.poll(t0 + secs(10));
    assert_eq!(clock.elapsed_seconds(), 10);

    clock.toggle(t0 + secs(10));
    assert_eq!(clock.status(), ClockStatus::Paused);
    assert!(!clock.ticker().is_armed());
    clock.poll(t0 + secs(25));
    clock.tick();
    assert_eq!(clock.elapsed_seconds(), 10);

    clock.toggle(t0 + secs(25));
    assert_eq!(clock.status(), ClockStatus::Running);
    clock.poll(t0 + secs(30));
    assert_eq!(clock.elapsed_seconds(), 15);

    // Starting again while running keeps counting from where it was
    clock.start(t0 + secs(30));
    clock.poll(t0 + secs(31));
    assert_eq!(clock.elapsed_seconds(), 16);
}

#[test]
fn test_workout_clock_toggle_alternates() {
    let t0 = Instant::now();
    let mut clock = WorkoutClock::default();

    // First toggle starts the workout
    clock.toggle(t0);
    assert!(clock.is_started());

    let mut expected = 0;
    for window in 0..6_u64 {
        let running = clock.is_running();
        assert_eq!(running, window % 2 == 0);
        for _ in 0..3 {
            clock.tick();
            if running {
                expected += 1;
            }
        }
        clock.toggle(t0 + secs(window));
    }
    assert_eq!(clock.elapsed_seconds(), expected);
    assert_eq!(expected, 9);
}

#[test]
fn test_workout_clock_status_labels_and_reset() {
    let mut clock = WorkoutClock::default();
    assert_eq!(clock.status().to_string(), "Tap to Begin");
    clock.start(Instant::now());
    assert_eq!(clock.status().to_string(), "Session Active");
    clock.toggle(Instant::now());
    assert_eq!(clock.status().to_string(), "Session Paused");

    for _ in 0..130 {
        clock.tick();
    }
    assert_eq!(clock.minutes(), 0); // paused

    clock.reset();
    assert_eq!(clock, WorkoutClock::default());
}

#[test]
fn test_rest_clock_runs_out() {
    let t0 = Instant::now();
    let mut rest = RestClock::default();
    rest.start(90, t0);
    assert!(rest.is_active());

    for _ in 0..89 {
        rest.tick();
    }
    assert!(rest.is_active());
    assert_eq!(rest.remaining_seconds(), 1);

    rest.tick();
    assert!(!rest.is_active());
    assert_eq!(rest.remaining_seconds(), 0);
    assert!(!rest.ticker().is_armed());

    // Further ticks are ignored
    rest.tick();
    assert_eq!(rest.remaining_seconds(), 0);
}

#[test]
fn test_rest_clock_poll_expires_and_stops() {
    let t0 = Instant::now();
    let mut rest = RestClock::default();
    rest.start(90, t0);
    rest.poll(t0 + secs(200));
    assert!(!rest.is_active());
    assert_eq!(rest.remaining_seconds(), 0);
}

#[test]
fn test_new_rest_replaces_running_rest() {
    let t0 = Instant::now();
    let mut rest = RestClock::default();
    rest.start(90, t0);
    rest.poll(t0 + secs(30));
    assert_eq!(rest.remaining_seconds(), 60);

    rest.start(45, t0 + Duration::from_millis(30_500));
    assert_eq!(rest.remaining_seconds(), 45);
    assert_eq!(rest.duration_seconds(), 45);

    rest.poll(t0 + secs(31));
    assert_eq!(rest.remaining_seconds(), 45);
    rest.poll(t0 + Duration::from_millis(31_500));
    assert_eq!(rest.remaining_seconds(), 44);
    rest.poll(t0 + Duration::from_millis(75_500));
    assert!(!rest.is_active());
}

#[test]
fn test_zero_length_rest_is_inactive() {
    let mut rest = RestClock::default();
    rest.start(0, Instant::now());
    assert!(!rest.is_active());
    assert!(!rest.ticker().is_armed());
}

#[test]
fn test_workout_and_rest_clocks_run_together() -> Result<()> {
    let mut session = create_test_session(small_catalog());
    let t0 = Instant::now();
    session.start_workout(t0);
    session.start_default_rest(t0);
    assert_eq!(session.rest_clock().remaining_seconds(), 60);

    session.poll(t0 + secs(20));
    assert_eq!(session.workout_clock().elapsed_seconds(), 20);
    assert_eq!(session.rest_clock().remaining_seconds(), 40);

    session.toggle_workout(t0 + secs(20));
    session.poll(t0 + secs(70));
    assert_eq!(session.workout_clock().elapsed_seconds(), 20);
    assert!(!session.rest_clock().is_active());
    Ok(())
}

#[test]
fn test_format_clock() {
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(59), "00:59");
    assert_eq!(format_clock(90), "01:30");
    assert_eq!(format_clock(6000), "100:00");
}

// --- Tip session ---

#[test]
fn test_tip_request_without_gateway_fails_without_calling() {
    let service = create_test_service(None);
    let mut session = service.new_session().unwrap();
    assert!(!session.tips_available());

    let request = service.fetch_tip_blocking(&mut session, "Squat");
    assert!(request.is_none());
    assert_eq!(
        session.tip(),
        &TipState::Failed {
            exercise: "Squat".to_string(),
            failure: TipFailure::NotConfigured,
        }
    );
    assert_eq!(
        session.tip().failure().unwrap().to_string(),
        "API key not configured. Cannot fetch tips."
    );
}

#[test]
fn test_tip_fetch_success_then_collapse() {
    let gateway = ScriptedGateway::new(vec![Ok("### Key Benefits\n* Strength".to_string())]);
    let service = create_test_service(Some(gateway.clone()));
    let mut session = service.new_session().unwrap();

    let request = service.fetch_tip_blocking(&mut session, "Squat").unwrap();
    assert!(request.prompt.contains("\"Squat\""));
    assert!(request.prompt.contains("Common mistakes"));
    assert_eq!(gateway.calls(), 1);
    assert_eq!(session.tip().content(), Some("### Key Benefits\n* Strength"));

    // Asking again for the loaded exercise hides the tip instead of fetching
    assert!(service.fetch_tip_blocking(&mut session, "Squat").is_none());
    assert_eq!(session.tip(), &TipState::Idle);
    assert_eq!(gateway.calls(), 1);
}

#[test]
fn test_tip_request_for_other_exercise_fetches() {
    let gateway = ScriptedGateway::new(vec![Ok("squat tip".into()), Ok("deadlift tip".into())]);
    let service = create_test_service(Some(gateway.clone()));
    let mut session = service.new_session().unwrap();

    service.fetch_tip_blocking(&mut session, "Squat");
    service.fetch_tip_blocking(&mut session, "Deadlift");
    assert_eq!(gateway.calls(), 2);
    assert_eq!(session.tip().target(), Some("Deadlift"));
    assert_eq!(session.tip().content(), Some("deadlift tip"));
}

#[test]
fn test_tip_failure_classification_and_retry() {
    let gateway = ScriptedGateway::new(vec![
        Err(api_error(400, "API key not valid. Please pass a valid API key.")),
        Err(api_error(429, "Resource has been exhausted (e.g. check quota).")),
        Err(api_error(500, "Internal error")),
        Ok("finally".into()),
    ]);
    let service = create_test_service(Some(gateway.clone()));
    let mut session = service.new_session().unwrap();

    service.fetch_tip_blocking(&mut session, "Squat");
    assert_eq!(session.tip().failure(), Some(TipFailure::InvalidApiKey));

    let retry = session.retry_tip("Squat").unwrap();
    let result = gateway.generate(&retry.prompt);
    assert!(session.resolve_tip(&retry, result));
    assert_eq!(session.tip().failure(), Some(TipFailure::QuotaExceeded));

    service.fetch_tip_blocking(&mut session, "Squat");
    assert_eq!(session.tip().failure(), Some(TipFailure::Generic));
    assert_eq!(session.tip().target(), Some("Squat"));

    service.fetch_tip_blocking(&mut session, "Squat");
    assert_eq!(session.tip().content(), Some("finally"));
    assert_eq!(gateway.calls(), 4);
}

#[test]
fn test_tip_failure_classify_messages() {
    assert_eq!(
        TipFailure::classify("API KEY NOT VALID. please pass a valid key"),
        TipFailure::InvalidApiKey
    );
    assert_eq!(TipFailure::classify("Quota exceeded for metric"), TipFailure::QuotaExceeded);
    assert_eq!(TipFailure::classify("connection reset"), TipFailure::Generic);
    assert_eq!(
        TipFailure::from(&api_error(400, "api key not valid")),
        TipFailure::InvalidApiKey
    );
    assert_eq!(TipFailure::from(&GatewayError::EmptyResponse), TipFailure::Generic);
    assert_eq!(
        TipFailure::QuotaExceeded.to_string(),
        "API quota exceeded. Please check your Gemini project quotas."
    );
    assert_eq!(
        TipFailure::InvalidApiKey.to_string(),
        "API Key is not valid. Please check your configuration."
    );
    assert_eq!(
        TipFailure::Generic.to_string(),
        "Sorry, couldn't fetch tips for this exercise. Please try again."
    );
}

#[test]
fn test_superseded_tip_response_is_discarded() {
    let mut session = create_test_session(small_catalog());
    let first = session.request_tip("Squat").unwrap();
    let second = session.request_tip("Deadlift").unwrap();
    assert!(second.generation > first.generation);

    assert!(!session.resolve_tip(&first, Ok("late squat tip".into())));
    assert_eq!(
        session.tip(),
        &TipState::Loading {
            exercise: "Deadlift".to_string()
        }
    );

    assert!(session.resolve_tip(&second, Ok("deadlift tip".into())));
    assert_eq!(session.tip().content(), Some("deadlift tip"));
}

#[test]
fn test_repeated_request_while_loading_keeps_latest() {
    let mut session = create_test_session(small_catalog());
    let first = session.request_tip("Squat").unwrap();
    let second = session.request_tip("Squat").unwrap();

    assert!(!session.resolve_tip(&first, Err(api_error(500, "boom"))));
    assert!(session.tip().is_loading());
    assert!(session.resolve_tip(&second, Ok("tip".into())));
    assert_eq!(session.tip().content(), Some("tip"));
}

#[test]
fn test_dismissed_tip_ignores_late_response() {
    let mut session = create_test_session(small_catalog());
    let request = session.request_tip("Squat").unwrap();
    session.dismiss_tip();
    assert!(!session.resolve_tip(&request, Ok("late".into())));
    assert_eq!(session.tip(), &TipState::Idle);
}

#[test]
fn test_completion_clears_tip_in_every_state() -> Result<()> {
    let key = ExerciseKey::new("push", 0); // Squat
    let t0 = Instant::now();

    // Loading, and the in-flight answer is dropped afterwards
    let mut session = create_test_session(small_catalog());
    let request = session.request_tip("Squat").unwrap();
    session.toggle_complete(&key, t0)?;
    assert_eq!(session.tip(), &TipState::Idle);
    assert!(!session.resolve_tip(&request, Ok("late".into())));
    assert_eq!(session.tip(), &TipState::Idle);

    // Loaded
    let mut session = create_test_session(small_catalog());
    let request = session.request_tip("Squat").unwrap();
    session.resolve_tip(&request, Ok("tip".into()));
    session.toggle_complete(&key, t0)?;
    assert_eq!(session.tip(), &TipState::Idle);

    // Failed
    let mut session = create_test_session(small_catalog());
    let request = session.request_tip("Squat").unwrap();
    session.resolve_tip(&request, Err(api_error(429, "quota")));
    session.toggle_complete(&key, t0)?;
    assert_eq!(session.tip(), &TipState::Idle);
    Ok(())
}

#[test]
fn test_completion_leaves_other_exercise_tip() -> Result<()> {
    let mut session = create_test_session(small_catalog());
    let request = session.request_tip("Deadlift").unwrap();
    session.toggle_complete(&ExerciseKey::new("push", 0), Instant::now())?;
    assert!(session.resolve_tip(&request, Ok("deadlift tip".into())));
    assert_eq!(session.tip().target(), Some("Deadlift"));

    // Un-completing never touches the tip
    session.toggle_complete(&ExerciseKey::new("push", 0), Instant::now())?;
    assert_eq!(session.tip().content(), Some("deadlift tip"));
    Ok(())
}

// --- Reset ---

#[test]
fn test_reset_all_restores_initial_state() -> Result<()> {
    let catalog = small_catalog();
    let keys: Vec<ExerciseKey> = catalog.keys().collect();
    let mut session = create_test_session(catalog);
    let t0 = Instant::now();

    session.start_workout(t0);
    session.next_set(&keys[1])?;
    for key in &keys {
        session.toggle_complete(key, t0)?;
    }
    let request = session.request_tip("Deadlift").unwrap();
    session.poll(t0 + secs(3));
    assert!(session.is_celebrating());

    session.reset_all();

    assert!(session.completion().is_empty());
    assert!(session.set_cursor().is_empty());
    assert_eq!(session.current_set(&keys[1]), 1);
    assert_eq!(session.workout_clock(), &WorkoutClock::default());
    assert_eq!(session.rest_clock(), &RestClock::default());
    assert_eq!(session.tip(), &TipState::Idle);
    assert!(!session.is_celebrating());

    // Nothing from before the reset leaks back in
    assert!(!session.resolve_tip(&request, Ok("late".into())));
    session.poll(t0 + secs(60));
    assert_eq!(session.workout_clock().elapsed_seconds(), 0);
    Ok(())
}

// --- Derived stats ---

#[test]
fn test_stats_and_section_progress() -> Result<()> {
    let mut session = create_test_session(small_catalog());
    let t0 = Instant::now();
    session.start_workout(t0);
    session.toggle_complete(&ExerciseKey::new("push", 1), t0)?;
    session.toggle_complete(&ExerciseKey::new("pull", 0), t0)?;
    session.poll(t0 + secs(150));

    let stats = session.stats();
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.percentage, 67);
    assert_eq!(stats.minutes, 2);
    assert_eq!(stats.categories, 2);
    assert!(!stats.workout_complete);

    let progress = session.section_progress();
    assert_eq!(progress.len(), 2);
    assert_eq!((progress[0].completed, progress[0].total), (1, 2));
    assert!(!progress[0].is_done());
    assert_eq!((progress[1].completed, progress[1].total), (1, 1));
    assert!(progress[1].is_done());
    Ok(())
}

// --- Catalog ---

#[test]
fn test_builtin_catalog_shape() {
    let catalog = Catalog::builtin();
    assert_eq!(catalog.sections().len(), 6);
    assert_eq!(catalog.total_exercises(), 30);

    let ids: Vec<&str> = catalog.sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["chest", "back", "shoulders", "biceps", "triceps", "legs"]);

    let first = catalog.keys().next().unwrap();
    assert_eq!(first.to_string(), "chest-0");
    assert_eq!(catalog.keys().last().unwrap().to_string(), "legs-4");

    let bench = catalog.exercise(&first).unwrap();
    assert_eq!(bench.name, "Barbell Bench Press");
    assert_eq!(bench.sets, 4);
    assert_eq!(bench.reps.to_string(), "10");
    assert_eq!(bench.difficulty, Difficulty::Hard);

    let (key, row) = catalog.find_exercise("row v-rod").unwrap();
    assert_eq!(key, ExerciseKey::new("back", 4));
    assert_eq!(row.reps, Reps::Range("8-15".to_string()));
    assert!(catalog.find_exercise("Bicycle Crunch").is_none());
}

#[test]
fn test_catalog_validation() {
    let duplicate = Catalog::new(vec![section("a", vec![]), section("a", vec![])]);
    assert!(matches!(duplicate, Err(CatalogError::DuplicateSectionId(id)) if id == "a"));

    let zero_sets = Catalog::new(vec![section("a", vec![exercise("Plank", 0)])]);
    assert!(matches!(zero_sets, Err(CatalogError::ZeroSets { .. })));

    let blank = Catalog::new(vec![section(" ", vec![])]);
    assert!(matches!(blank, Err(CatalogError::EmptySectionId(_))));
}

#[test]
fn test_catalog_load_from_toml() -> Result<()> {
    let path = temp_path("catalog.toml");
    std::fs::write(
        &path,
        r#"
[[sections]]
id = "core"
title = "Core"
icon = "C"
color = "Yellow"

[[sections.exercises]]
name = "Plank"
sets = 3
reps = "30-60s"
weight = "Bodyweight"
difficulty = "Easy"

[[sections.exercises]]
name = "Cable Crunch"
sets = 3
reps = 12
weight = "60lbs"
difficulty = "Medium"
"#,
    )?;

    let catalog = Catalog::load(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(catalog.total_exercises(), 2);
    let section = catalog.section("core").unwrap();
    assert_eq!(section.color, "Yellow");
    assert_eq!(section.exercises[0].reps, Reps::Range("30-60s".to_string()));
    assert_eq!(section.exercises[1].reps, Reps::Count(12));
    assert_eq!(section.exercises[1].difficulty, Difficulty::Medium);
    Ok(())
}

#[test]
fn test_difficulty_parses_case_insensitively() {
    assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    assert_eq!(Difficulty::Easy.to_string(), "Easy");
    assert!("brutal".parse::<Difficulty>().is_err());
}

// --- Config ---

#[test]
fn test_config_defaults_written_and_reloaded() -> Result<()> {
    let path = temp_path("config.toml");
    let config = pale_grind_lib::load_config_util(&path)?;
    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(config.rest_presets, vec![60, 90]);
    assert_eq!(config.completion_rest_seconds, 90);
    assert_eq!(config.celebration_millis, 4500);

    let mut changed = config.clone();
    changed.api_key = Some("abc".to_string());
    changed.default_rest_seconds = 45;
    pale_grind_lib::save_config_util(&path, &changed)?;
    let reloaded = pale_grind_lib::load_config_util(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(reloaded, changed);
    Ok(())
}

#[test]
fn test_store_api_key_ignores_broken_catalog_path() -> Result<()> {
    let path = temp_path("broken-catalog.toml");
    let missing_catalog = temp_path("missing-catalog.toml");
    std::fs::write(
        &path,
        format!("catalog_path = {:?}\ndefault_rest_seconds = 45\n", missing_catalog.display().to_string()),
    )?;
    assert!(Catalog::load(&missing_catalog).is_err());

    let stored = pale_grind_lib::store_api_key_util(&path, Some("  new-key  ".to_string()))?;
    assert_eq!(stored.api_key.as_deref(), Some("new-key"));
    let reloaded = pale_grind_lib::load_config_util(&path)?;
    assert_eq!(reloaded.api_key.as_deref(), Some("new-key"));
    assert_eq!(reloaded.catalog_path.as_deref(), Some(missing_catalog.as_path()));
    assert_eq!(reloaded.default_rest_seconds, 45);

    // Blank keys clear the entry
    let cleared = pale_grind_lib::store_api_key_util(&path, Some("   ".to_string()))?;
    assert_eq!(cleared.api_key, None);
    pale_grind_lib::store_api_key_util(&path, None)?;
    let reloaded = pale_grind_lib::load_config_util(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(reloaded.api_key, None);
    Ok(())
}

#[test]
fn test_config_missing_fields_fall_back_to_defaults() -> Result<()> {
    let path = temp_path("partial.toml");
    std::fs::write(&path, "default_rest_seconds = 30\n[theme]\nheader_color = \"Red\"\n")?;
    let config = pale_grind_lib::load_config_util(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(config.default_rest_seconds, 30);
    assert_eq!(config.completion_rest_seconds, 90);
    assert_eq!(config.theme.header_color, "Red");
    assert_eq!(config.theme.accent_color, "Magenta");
    assert_eq!(config.model, pale_grind_lib::DEFAULT_MODEL);
    Ok(())
}

#[test]
fn test_config_session_settings() {
    let config = Config {
        completion_rest_seconds: 120,
        celebration_millis: 1000,
        ..Config::default()
    };
    let settings = config.session_settings().unwrap();
    assert_eq!(settings.completion_rest_seconds, 120);
    assert_eq!(settings.default_rest_seconds, 60);
    assert_eq!(settings.celebration, Duration::from_secs(1));

    let broken = Config {
        rest_presets: vec![60, 0],
        ..Config::default()
    };
    assert!(matches!(
        broken.session_settings(),
        Err(ConfigError::InvalidRestDuration(0))
    ));
}

#[test]
fn test_parse_color() {
    assert_eq!(parse_color("darkblue").unwrap(), StandardColor::DarkBlue);
    assert_eq!(parse_color(" Red ").unwrap(), StandardColor::Red);
    assert!(matches!(parse_color("mauve"), Err(ConfigError::InvalidColor(_))));
}

#[test]
fn test_session_uses_configured_rest_after_completion() -> Result<()> {
    let mut service = create_test_service(None);
    service.config.completion_rest_seconds = 30;
    let mut session = service.new_session()?;
    session.toggle_complete(&ExerciseKey::new("pull", 0), Instant::now())?;
    assert_eq!(session.rest_clock().remaining_seconds(), 30);
    Ok(())
}

// --- Gateway response handling ---

#[test]
fn test_tip_prompt_names_exercise_and_sections() {
    let prompt = tip_prompt("Barbell Row");
    assert!(prompt.starts_with("Provide helpful information for the exercise: \"Barbell Row\"."));
    assert!(prompt.contains("(e.g., \"### Key Benefits\")"));
    assert!(prompt.contains("3.  Common mistakes to avoid."));
    assert!(prompt.ends_with("concise and easy to read."));
}

#[test]
fn test_parse_generate_response_joins_parts() -> Result<()> {
    let body = r####"{
        "candidates": [
            {"content": {"parts": [{"text": "### Key Benefits\n"}, {"text": "* Builds legs"}], "role": "model"}},
            {"content": {"parts": [{"text": "ignored"}]}}
        ],
        "usageMetadata": {"totalTokenCount": 42}
    }"####;
    assert_eq!(parse_generate_response(body)?, "### Key Benefits\n* Builds legs");
    Ok(())
}

#[test]
fn test_parse_generate_response_errors() {
    assert!(matches!(
        parse_generate_response(r#"{"candidates": []}"#),
        Err(GatewayError::EmptyResponse)
    ));
    assert!(matches!(
        parse_generate_response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#),
        Err(GatewayError::EmptyResponse)
    ));
    assert!(matches!(
        parse_generate_response("not json"),
        Err(GatewayError::Decode(_))
    ));
}

#[test]
fn test_parse_error_message() {
    let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
    let message = parse_error_message(body);
    assert_eq!(message, "API key not valid. Please pass a valid API key.");
    assert_eq!(
        TipFailure::from(&api_error(400, &message)),
        TipFailure::InvalidApiKey
    );
    assert_eq!(parse_error_message("  upstream timeout \n"), "upstream timeout");
}
