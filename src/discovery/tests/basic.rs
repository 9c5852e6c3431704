use super::write_file;
use crate::discovery::{discover, DiscoveryError};
use crate::grammar::Dialect;

#[test]
fn test_root_without_references_yields_main_only() {
    println!("\n=== Starting test_root_without_references_yields_main_only ===");
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "Main.fst", "------- OpenFAST INPUT -------\n30.0  TMax  - Total run time (s)\n");

    let structure = discover(&root, &Dialect::openfast()).unwrap();
    assert_eq!(structure.len(), 1);
    let main = structure.get("Main").expect("Main role missing");
    assert_eq!(main.path, root.canonicalize().unwrap());
    assert!(main.path.is_absolute());
}

#[test]
fn test_mutual_references_terminate() {
    println!("\n=== Starting test_mutual_references_terminate ===");
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dat", "\"b.dat\"   BFile  - points at b\n");
    write_file(dir.path(), "b.dat", "\"a.dat\"   AFile  - points back at a\n");

    let structure = discover(&a, &Dialect::openfast()).unwrap();
    assert_eq!(structure.len(), 2, "Each file should be processed exactly once");
    assert!(structure.get("Main").is_some());
    assert!(structure.get("BFile").is_some());
    assert!(structure.get("AFile").is_none());
}

#[test]
fn test_nested_references_and_role_collisions() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(
        dir.path(),
        "Turbine.fst",
        concat!(
            "\"ElastoDyn.dat\"   EDFile  - structural model (quoted string)\n",
            "\"AeroDyn.dat\"     AeroFile - aerodynamics (quoted string)\n",
            "\"unused\"          BDBldFile(1) - not used\n",
            "\"Echo.dat\"        Echo - skipped keyword\n",
        ),
    );
    write_file(
        dir.path(),
        "ElastoDyn.dat",
        concat!(
            "\"Blade.dat\"    BldFile(1) - blade 1\n",
            "\"Tower.dat\"    TwrFile    - tower\n",
        ),
    );
    write_file(dir.path(), "AeroDyn.dat", "\"AeroTower.dat\"  TwrFile - aero tower data\n");
    write_file(dir.path(), "Blade.dat", "1.0 BldFlDmp(1) - damping (%)\n");
    write_file(dir.path(), "Tower.dat", "1.0 TwrFADmp(1) - damping (%)\n");
    write_file(dir.path(), "AeroTower.dat", "4 NumTwrNds - nodes (-)\n");
    write_file(dir.path(), "Echo.dat", "never read\n");

    let structure = discover(&root, &Dialect::openfast()).unwrap();
    let roles: Vec<&str> = structure.files().iter().map(|f| f.role.as_str()).collect();
    assert_eq!(roles, vec!["Main", "EDFile", "AeroFile", "BldFile(1)", "TwrFile", "TwrFile_2"]);
    assert!(structure.get("TwrFile_2").unwrap().path.ends_with("AeroTower.dat"));
}

#[test]
fn test_airfoil_list_block() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "Main.fst", "\"AeroDyn15.dat\"  AeroFile - aerodynamics\n");
    write_file(
        dir.path(),
        "AeroDyn15.dat",
        concat!(
            "======  Airfoil Information =========================================\n",
            "          1   AFTabMod   - Interpolation method (switch)\n",
            "          3   NumAFfiles - Number of airfoil files used (-)\n",
            "\"Airfoils/Cylinder1.dat\"    AFNames   - Airfoil file names (quoted strings)\n",
            "\"Airfoils/Cylinder2.dat\"\n",
            "\"Airfoils/DU40_A17.dat\"\n",
            "\"Airfoils/NotInBlock.dat\"\n",
        ),
    );
    for name in ["Cylinder1", "Cylinder2", "DU40_A17", "NotInBlock"] {
        write_file(dir.path(), &format!("Airfoils/{}.dat", name), "0.75 Re - Reynolds number (-)\n");
    }

    let structure = discover(&root, &Dialect::openfast()).unwrap();
    assert!(structure.get("AFNames").unwrap().path.ends_with("Airfoils/Cylinder1.dat"));
    assert!(structure.get("AirfoilFile_2").unwrap().path.ends_with("Airfoils/Cylinder2.dat"));
    assert!(structure.get("AirfoilFile_3").unwrap().path.ends_with("Airfoils/DU40_A17.dat"));
    // AirfoilFile_1 points at the same file as AFNames, which was processed first
    assert!(structure.get("AirfoilFile_1").is_none());
    assert!(structure.files().iter().all(|f| !f.path.ends_with("NotInBlock.dat")));
    assert_eq!(structure.len(), 5);
}

#[test]
fn test_unresolvable_references_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "Main.fst", "\"Missing.dat\"  EDFile - gone\n");

    let structure = discover(&root, &Dialect::openfast()).unwrap();
    assert_eq!(structure.len(), 1);
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    match discover(&dir.path().join("nope.fst"), &Dialect::openfast()) {
        Err(DiscoveryError::RootNotFound(_)) => {}
        other => panic!("Expected RootNotFound, got {:?}", other),
    }
}
