use crate::extraction::{extract_all, extract_from_str};
use crate::grammar::Dialect;
use crate::types::{ParamType, ParamValue};

const ELASTODYN: &str = "\
------- ELASTODYN v1.03.* INPUT FILE -------------------------------------------
NREL 5.0 MW Baseline Wind Turbine for Use in Offshore Analysis.
---------------------- SIMULATION CONTROL --------------------------------------
False         Echo        - Echo input data to \"<RootName>.ech\" (flag)
          3   Method      - Integration method: {1: RK4, 2: AB4, or 3: ABM4} (-)
\"default\"     DT          - Integration time step (s)
---------------------- DEGREES OF FREEDOM --------------------------------------
True          FlapDOF1    - First flapwise blade mode DOF (flag)
---------------------- INITIAL CONDITIONS --------------------------------------
       -2.5   PreCone(1)  - Blade 1 cone angle (degrees)
     12.1     RotSpeed    - Initial or fixed rotor speed (rpm)
  1.500000    TipRad      - Blade tip radius (m)
  1.500000    TipRad      - Duplicate declaration (m)
   1.0E+03    HubMass     ! Hub mass (kg)
\"Blade.dat\"   BldFile(1)  - Name of the file containing properties for blade 1 (quoted string)
   Tower.dat  TwrFile     - unquoted file value
   BEMT       WakeMod     - Type of wake/induction model (switch)
   hello      Greeting    - just words
          1   End         - reserved name
";

#[test]
fn test_extracts_typed_parameters_with_line_numbers() {
    let extraction = extract_from_str(ELASTODYN, "ElastoDyn", &Dialect::openfast());
    let params = &extraction.parameters;

    let method = &params["Method"];
    assert_eq!(method.original_value, ParamValue::Int(3));
    assert_eq!(method.param_type, ParamType::Int);
    assert_eq!(method.line_number, 4);
    assert_eq!(method.role, "ElastoDyn");

    let flap = &params["FlapDOF1"];
    assert_eq!(flap.original_value, ParamValue::Bool(true));
    assert_eq!(flap.unit, None);

    let precone = &params["PreCone(1)"];
    assert_eq!(precone.original_value, ParamValue::Float(-2.5));
    assert_eq!(precone.unit.as_deref(), Some("degrees"));

    let tip = &params["TipRad"];
    assert_eq!(tip.param_type, ParamType::Float);
    assert_eq!(tip.line_number, 11, "First declaration wins");
    assert_eq!(tip.description, "Blade tip radius (m)");

    let hub = &params["HubMass"];
    assert_eq!(hub.original_value, ParamValue::Float(1000.0));
    assert_eq!(hub.unit.as_deref(), Some("kg"));

    let wake = &params["WakeMod"];
    assert_eq!(wake.original_value, ParamValue::Text("BEMT".to_string()));
    assert_eq!(wake.param_type, ParamType::Option);
}

#[test]
fn test_rejected_lines_are_counted_not_reported() {
    let extraction = extract_from_str(ELASTODYN, "ElastoDyn", &Dialect::openfast());
    let params = &extraction.parameters;

    assert!(!params.contains_key("Echo"), "Echo is reserved");
    assert!(!params.contains_key("End"), "End is reserved");
    assert!(!params.contains_key("DT"), "Quoted values are not parameters");
    assert!(!params.contains_key("BldFile(1)"));
    assert!(!params.contains_key("TwrFile"), "File values are not parameters");
    assert!(!params.contains_key("Greeting"), "Untyped text is not a parameter");
    // Echo, TwrFile, Greeting, End
    assert_eq!(extraction.skipped, 4);
    assert_eq!(params.len(), 7);
}

#[test]
fn test_extract_all_populates_structure() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Main.fst");
    std::fs::write(&root, "\"ElastoDyn.dat\"  EDFile - structure (quoted string)\n30.0 TMax - Total run time (s)\n").unwrap();
    std::fs::write(dir.path().join("ElastoDyn.dat"), ELASTODYN).unwrap();

    let dialect = Dialect::openfast();
    let mut structure = crate::discovery::discover(&root, &dialect).unwrap();
    let report = extract_all(&mut structure, &dialect);

    assert_eq!(report.files, 2);
    assert_eq!(report.parameters, 8);
    assert_eq!(structure.parameter("Main", "TMax").unwrap().unit.as_deref(), Some("s"));
    assert!(structure.parameter("EDFile", "TipRad").is_some());
    assert_eq!(structure.parameter_count(), 8);
}
