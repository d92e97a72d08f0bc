use chrono::NaiveDate;
use permitplan_core::{EngineConfig, Permit, PermitType, PlanRegistry, PlanRegistryError};

#[test]
fn saving_binds_the_new_plan_and_snapshots_the_permits() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    let permits = vec![regular(date(2026, 1, 1))];

    let plan = registry.save_as_new_plan(&permits, &config);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.active_plan_id(), Some(plan.id));
    assert_eq!(registry.get(plan.id).unwrap().permits, permits);
}

#[test]
fn auto_names_are_sequential() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    registry.save_as_new_plan(&[], &config);
    registry.save_as_new_plan(&[], &config);

    assert_eq!(registry.plans()[0].name, format!("{} 1", config.plan_name_prefix));
    assert_eq!(registry.plans()[1].name, format!("{} 2", config.plan_name_prefix));
}

#[test]
fn switching_returns_the_snapshot_and_rebinds() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    let first = registry.save_as_new_plan(&[regular(date(2026, 1, 1))], &config);
    let second = registry.save_as_new_plan(&[regular(date(2026, 2, 1))], &config);
    assert_eq!(registry.active_plan_id(), Some(second.id));

    let permits = registry.switch_to(first.id).unwrap();
    assert_eq!(permits, first.permits);
    assert_eq!(registry.active_plan_id(), Some(first.id));
}

#[test]
fn sync_bound_updates_only_the_bound_snapshot() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    let untouched = registry.save_as_new_plan(&[regular(date(2026, 1, 1))], &config);
    let bound = registry.save_as_new_plan(&[], &config);

    let updated = vec![regular(date(2026, 3, 1))];
    assert!(registry.sync_bound(&updated));
    assert_eq!(registry.get(bound.id).unwrap().permits, updated);
    assert_eq!(registry.get(untouched.id).unwrap().permits, untouched.permits);
}

#[test]
fn sync_without_a_binding_is_a_no_op() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    let plan = registry.save_as_new_plan(&[regular(date(2026, 1, 1))], &config);
    registry.unbind();

    assert!(!registry.sync_bound(&[]));
    assert_eq!(registry.get(plan.id).unwrap().permits.len(), 1);
}

#[test]
fn removing_the_bound_plan_unbinds() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    let plan = registry.save_as_new_plan(&[], &config);

    let removed = registry.remove(plan.id).unwrap();
    assert_eq!(removed.id, plan.id);
    assert!(registry.is_empty());
    assert_eq!(registry.active_plan_id(), None);
}

#[test]
fn removing_an_unbound_plan_keeps_the_binding() {
    let config = EngineConfig::default();
    let mut registry = PlanRegistry::new();
    let first = registry.save_as_new_plan(&[], &config);
    let second = registry.save_as_new_plan(&[], &config);

    registry.remove(first.id).unwrap();
    assert_eq!(registry.active_plan_id(), Some(second.id));
}

#[test]
fn unknown_plan_ids_are_rejected() {
    let mut registry = PlanRegistry::new();
    let ghost = uuid::Uuid::new_v4();

    assert!(matches!(
        registry.switch_to(ghost),
        Err(PlanRegistryError::PlanNotFound(id)) if id == ghost
    ));
    assert!(matches!(
        registry.remove(ghost),
        Err(PlanRegistryError::PlanNotFound(_))
    ));
}

fn regular(start: NaiveDate) -> Permit {
    Permit::new(start, PermitType::Regular, 7)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
