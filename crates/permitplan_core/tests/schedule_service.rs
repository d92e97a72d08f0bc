use chrono::NaiveDate;
use permitplan_core::db::open_db_in_memory;
use permitplan_core::{
    ApproveAll, ConfirmationGate, DestructiveAction, EngineConfig, HolidayInfo, InsertOutcome,
    KvRepository, MemoryKvRepository, NoHolidays, PermitType, ScheduleService,
    SqliteKvRepository, StaticHolidayCalendar,
};

struct DeclineAll;

impl ConfirmationGate for DeclineAll {
    fn confirm(&self, _action: DestructiveAction) -> bool {
        false
    }
}

#[test]
fn inserting_persists_the_encoded_schedule() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config.clone());

    service
        .insert_permit(date(2026, 3, 15), PermitType::Regular)
        .unwrap();

    let stored = service.repo().get(&config.schedule_key).unwrap();
    assert_eq!(stored.as_deref(), Some("$2026R3f"));
    assert_eq!(service.share_code(None), "$2026R3f");
}

#[test]
fn load_restores_a_persisted_schedule() {
    let config = EngineConfig::default();
    let mut repo = MemoryKvRepository::new();
    repo.set(&config.schedule_key, "$2026T5kR11").unwrap();

    let mut service = ScheduleService::new(repo, config);
    service.load().unwrap();

    assert_eq!(service.permits().len(), 2);
    // The store reorders whatever the code carried.
    assert_eq!(service.permits()[0].start_date, date(2026, 1, 1));
    assert_eq!(service.permits()[1].start_date, date(2026, 5, 20));
    assert_eq!(service.active_plan_id(), None);
}

#[test]
fn load_migrates_a_legacy_json_entry_and_rewrites_on_next_mutation() {
    let config = EngineConfig::default();
    let mut repo = MemoryKvRepository::new();
    repo.set(
        &config.schedule_key,
        r#"[{"startDate":"2026-01-01T00:00:00.000Z"}]"#,
    )
    .unwrap();

    let mut service = ScheduleService::new(repo, config.clone());
    service.load().unwrap();
    assert_eq!(service.permits().len(), 1);
    assert_eq!(service.permits()[0].kind, PermitType::Regular);

    service
        .insert_permit(date(2026, 2, 1), PermitType::Regular)
        .unwrap();
    let stored = service.repo().get(&config.schedule_key).unwrap().unwrap();
    assert_eq!(stored, "$2026R11R21");
}

#[test]
fn load_degrades_corrupt_entries_to_empty_state() {
    let config = EngineConfig::default();
    let mut repo = MemoryKvRepository::new();
    repo.set(&config.schedule_key, "garbage!!").unwrap();
    repo.set(&config.plans_key, "{not a plans array}").unwrap();

    let mut service = ScheduleService::new(repo, config);
    service.load().unwrap();

    assert!(service.permits().is_empty());
    assert!(service.plans().is_empty());
}

#[test]
fn toggling_a_permit_off_persists_the_empty_code() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config.clone());

    service
        .insert_permit(date(2026, 3, 15), PermitType::Regular)
        .unwrap();
    let outcome = service
        .insert_permit(date(2026, 3, 15), PermitType::Regular)
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::Removed { .. }));
    assert!(service.permits().is_empty());
    let stored = service.repo().get(&config.schedule_key).unwrap();
    assert_eq!(stored.as_deref(), Some(""));
}

#[test]
fn removing_a_permit_by_id_persists() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config.clone());
    let placed = match service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap()
    {
        InsertOutcome::Placed { permit, .. } => permit,
        other => panic!("unexpected outcome: {other:?}"),
    };

    let removed = service.remove_permit(placed.id).unwrap().unwrap();
    assert_eq!(removed.id, placed.id);
    assert!(service.remove_permit(placed.id).unwrap().is_none());
    let stored = service.repo().get(&config.schedule_key).unwrap();
    assert_eq!(stored.as_deref(), Some(""));
}

#[test]
fn a_bound_plan_tracks_store_mutations_until_unbound() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config);

    service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap();
    let plan = service.save_as_new_plan().unwrap();
    assert_eq!(service.active_plan_id(), Some(plan.id));

    service
        .insert_permit(date(2026, 2, 1), PermitType::Regular)
        .unwrap();
    assert_eq!(service.plans()[0].permits.len(), 2);

    service.unbind_plan();
    service
        .insert_permit(date(2026, 3, 1), PermitType::Regular)
        .unwrap();
    assert_eq!(service.permits().len(), 3);
    assert_eq!(service.plans()[0].permits.len(), 2);
}

#[test]
fn switching_plans_replaces_the_store_wholesale() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config);

    service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap();
    let first = service.save_as_new_plan().unwrap();
    service.unbind_plan();

    service
        .insert_permit(date(2026, 2, 1), PermitType::Regular)
        .unwrap();
    let second = service.save_as_new_plan().unwrap();
    assert_eq!(second.permits.len(), 2);

    service.switch_plan(first.id).unwrap();
    assert_eq!(service.permits().len(), 1);
    assert_eq!(service.permits()[0].start_date, date(2026, 1, 1));
    assert_eq!(service.active_plan_id(), Some(first.id));
}

#[test]
fn declined_gates_leave_every_piece_of_state_untouched() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config.clone());
    service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap();
    let plan = service.save_as_new_plan().unwrap();
    let stored_before = service.repo().get(&config.schedule_key).unwrap();

    assert!(!service.clear_all(&DeclineAll).unwrap());
    assert!(!service.remove_plan(plan.id, &DeclineAll).unwrap());

    assert_eq!(service.permits().len(), 1);
    assert_eq!(service.plans().len(), 1);
    assert_eq!(service.active_plan_id(), Some(plan.id));
    let stored_after = service.repo().get(&config.schedule_key).unwrap();
    assert_eq!(stored_before, stored_after);
}

#[test]
fn approved_clear_all_empties_and_persists() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config.clone());
    service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap();

    assert!(service.clear_all(&ApproveAll).unwrap());
    assert!(service.permits().is_empty());
    let stored = service.repo().get(&config.schedule_key).unwrap();
    assert_eq!(stored.as_deref(), Some(""));
}

#[test]
fn removing_the_bound_plan_keeps_the_active_permits() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config);
    service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap();
    let plan = service.save_as_new_plan().unwrap();

    assert!(service.remove_plan(plan.id, &ApproveAll).unwrap());
    assert!(service.plans().is_empty());
    assert_eq!(service.active_plan_id(), None);
    assert_eq!(service.permits().len(), 1);
}

#[test]
fn remove_round_deletes_exactly_that_round() {
    let config = EngineConfig::default();
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config);
    for week in 0..13 {
        service
            .insert_permit(
                date(2026, 1, 1) + chrono::Duration::days(week * 7),
                PermitType::Regular,
            )
            .unwrap();
    }

    let removed = service.remove_round(2026, 0).unwrap();
    assert_eq!(removed.len(), 12);
    assert_eq!(service.permits().len(), 1);
    assert_eq!(service.permits()[0].start_date, date(2026, 3, 26));

    assert!(service.remove_round(2026, 7).unwrap().is_empty());
    assert!(service.remove_round(2031, 0).unwrap().is_empty());
}

#[test]
fn year_overview_combines_rounds_gaps_and_quota() {
    let config = EngineConfig::default();
    let calendar = StaticHolidayCalendar::new()
        .with_entry(date(2026, 1, 25), HolidayInfo::public_holiday("春节"));
    let mut service = ScheduleService::new(MemoryKvRepository::new(), config.clone());

    service
        .insert_permit(date(2026, 1, 1), PermitType::Regular)
        .unwrap();
    service
        .insert_permit(date(2026, 1, 8), PermitType::Temporary)
        .unwrap();
    let second = match service
        .insert_permit(date(2026, 2, 1), PermitType::Regular)
        .unwrap()
    {
        InsertOutcome::Placed { permit, .. } => permit,
        other => panic!("unexpected outcome: {other:?}"),
    };
    service
        .insert_permit(date(2027, 1, 1), PermitType::Regular)
        .unwrap();

    let overview = service.year_overview(2026, &calendar);
    assert_eq!(overview.year, 2026);
    assert_eq!(overview.regular_count, 2);
    assert_eq!(overview.rounds.len(), 1);
    assert_eq!(overview.rounds[0].len(), 3);

    let gap = &overview.gaps[&second.id];
    assert_eq!(gap.days, 24);
    assert_eq!(
        gap.labels,
        vec![config.temporary_gap_label.clone(), "春节".to_string()]
    );

    let next_year = service.year_overview(2027, &NoHolidays);
    assert_eq!(next_year.regular_count, 1);
    assert!(next_year.gaps.is_empty());
}

#[test]
fn sqlite_backed_service_round_trips_through_the_connection() {
    let config = EngineConfig::default();
    let conn = open_db_in_memory().unwrap();

    {
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut service = ScheduleService::new(repo, config.clone());
        service.load().unwrap();
        service
            .insert_permit(date(2026, 3, 15), PermitType::Regular)
            .unwrap();
        service.save_as_new_plan().unwrap();
    }

    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut service = ScheduleService::new(repo, config.clone());
    service.load().unwrap();

    assert_eq!(service.permits().len(), 1);
    assert_eq!(service.permits()[0].start_date, date(2026, 3, 15));
    assert_eq!(service.plans().len(), 1);
    // Bindings are runtime state; a fresh load starts detached.
    assert_eq!(service.active_plan_id(), None);
    assert_eq!(service.share_code(None), "$2026R3f");
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
