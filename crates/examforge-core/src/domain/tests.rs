//! Tests for catalog domain types.

use super::*;
use crate::error::CatalogError;

fn module(code: &str, semester: u32) -> Module {
    ModuleRecord::new(code, "CE", semester, 100).build().unwrap()
}

#[test]
fn test_module_rejects_zero_semester() {
    let err = ModuleRecord::new("CE0001", "CE", 0, 10).build().unwrap_err();
    assert!(matches!(err, CatalogError::InvalidModule { ref code, .. } if code == "CE0001"));
}

#[test]
fn test_module_rejects_zero_duration() {
    let err = ModuleRecord::new("CE0001", "CE", 1, 10)
        .duration(0)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("duration"));
}

#[test]
fn test_module_name_falls_back_to_code() {
    let m = module("CE1101", 1);
    assert_eq!(m.name(), "CE1101");
}

#[test]
fn test_module_deserializes_with_students_alias() {
    let json = r#"{"code":"EE1101","name":"Computer Programming I","department":"EE",
                   "semester":1,"students":550,"iscommon":true}"#;
    let m: Module = serde_json::from_str(json).unwrap();
    assert_eq!(m.number_of_students(), 550);
    assert_eq!(m.duration(), 1);
    assert!(m.is_common());
}

#[test]
fn test_module_deserialization_validates() {
    let json = r#"{"code":"EE1101","department":"EE","semester":0,"number_of_students":5}"#;
    assert!(serde_json::from_str::<Module>(json).is_err());
}

#[test]
fn test_hall_rejects_blank_name() {
    assert!(matches!(
        Hall::new("  ", 10),
        Err(CatalogError::InvalidHall { .. })
    ));
}

#[test]
fn test_catalog_rejects_empty_grid() {
    let halls = vec![Hall::new("LR1", 100).unwrap()];

    let err = Catalog::new(vec![], vec![], Day::sequence(2), 2).unwrap_err();
    assert!(matches!(err, CatalogError::NoHalls));

    let err = Catalog::new(vec![], halls.clone(), vec![], 2).unwrap_err();
    assert!(matches!(err, CatalogError::NoDays));

    let err = Catalog::new(vec![], halls, Day::sequence(2), 0).unwrap_err();
    assert!(matches!(err, CatalogError::NoSlots));
}

#[test]
fn test_catalog_rejects_duplicate_codes() {
    let err = Catalog::new(
        vec![module("A", 1), module("A", 2)],
        vec![Hall::new("LR1", 100).unwrap()],
        Day::sequence(2),
        2,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateModule(ref c) if c == "A"));
}

#[test]
fn test_catalog_prefix_keeps_grid() {
    let catalog = Catalog::new(
        vec![module("A", 1), module("B", 1), module("C", 3)],
        vec![Hall::new("LR1", 100).unwrap()],
        Day::sequence(4),
        2,
    )
    .unwrap();

    let prefix = catalog.prefix(2);
    assert_eq!(prefix.modules().len(), 2);
    assert_eq!(prefix.days().len(), 4);
    assert_eq!(catalog.prefix(99).modules().len(), 3);
}

#[test]
fn test_catalog_from_json() {
    let json = r#"{
        "modules": [{"code":"CE1101","department":"CE","semester":1,"number_of_students":50}],
        "halls": [{"hall":"LR1","capacity":550}],
        "days": ["Mon","Tue"],
        "slots_per_day": 2
    }"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.halls()[0].name(), "LR1");
    assert_eq!(catalog.days()[1].as_str(), "Tue");
    assert_eq!(catalog.max_hall_capacity(), 550);
}

#[test]
fn test_catalog_json_rejects_zero_slots() {
    let json = r#"{"modules":[],"halls":[{"name":"LR1","capacity":5}],"days":["Mon"],"slots_per_day":0}"#;
    let err = Catalog::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("slots_per_day"));
}
