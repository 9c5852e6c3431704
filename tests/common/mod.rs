#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const MAIN_FST: &str = "\
------- OpenFAST INPUT FILE -------------------------------------------
NREL 5.0 MW Baseline Wind Turbine, semi-submersible
---------------------- SIMULATION CONTROL --------------------------------------
False         Echo            - Echo input data to <RootName>.ech (flag)
      600.0   TMax            - Total run time (s)
     0.0125   DT              - Recommended module time step (s)
---------------------- FEATURE SWITCHES AND FLAGS ------------------------------
          1   CompElast       - Compute structural dynamics (switch) {1=ElastoDyn; 2=ElastoDyn + BeamDyn for blades}
---------------------- INPUT FILES ---------------------------------------------
\"NRELOffshrBsline5MW_OC4DeepCwindSemi_ElastoDyn.dat\"    EDFile          - Name of file containing ElastoDyn input parameters (quoted string)
\"NRELOffshrBsline5MW_AeroDyn15.dat\"    AeroFile        - Name of file containing aerodynamic input parameters (quoted string)
\"unused\"      BDBldFile(1)    - Name of file containing BeamDyn input parameters for blade 1 (quoted string)
---------------------- OUTPUT --------------------------------------------------
True          SumPrint        - Print summary data to \"<RootName>.sum\" (flag)
\"ES10.3E2\"    OutFmt          - Format used for text tabular output (quoted string)
END of input file (the word \"END\" must appear in the first 3 columns of this last line)
";

pub const ELASTODYN: &str = "\
------- ELASTODYN v1.03.* INPUT FILE -------------------------------------------
---------------------- DEGREES OF FREEDOM --------------------------------------
True          FlapDOF1    - First flapwise blade mode DOF (flag)
---------------------- INITIAL CONDITIONS --------------------------------------
          0   OoPDefl     - Initial out-of-plane blade-tip displacement (meters)
     12.1     RotSpeed    - Initial or fixed rotor speed (rpm)
---------------------- TURBINE CONFIGURATION -----------------------------------
          3   NumBl       - Number of blades (-)
       63.0   TipRad      - The distance from the rotor apex to the blade tip (meters)
        1.5   HubRad      - The distance from the rotor apex to the blade root (meters)
       -2.5   PreCone(1)  - Blade 1 cone angle (degrees)
---------------------- BLADE ---------------------------------------------------
\"Blades\\NRELOffshrBsline5MW_Blade.dat\"    BldFile(1)  - Name of file containing properties for blade 1 (quoted string)
";

pub const AERODYN: &str = "\
------- AERODYN v15.03.* INPUT FILE ------------------------------------------------
          1   WakeMod            - Type of wake/induction model (switch) {0=none, 1=BEMT, 2=DBEMT}
          2   AFAeroMod          - Type of blade airfoil aerodynamics model (switch)
      1.225   AirDens            - Air density (kg/m^3)
======  Airfoil Information =========================================================================
          2   NumAFfiles         - Number of airfoil files used (-)
\"Airfoils/Cylinder1.dat\"
\"Airfoils/DU40_A17.dat\"
";

pub const BLADE: &str = "\
------- ELASTODYN V1.00.* INDIVIDUAL BLADE INPUT FILE --------------------------
         49   NBlInpSt    - Number of blade input stations (-)
      2.477   BldFlDmp(1) - Blade flap mode #1 structural damping in percent of critical (%)
";

pub const AIRFOIL: &str = "\
! ------------ AirfoilInfo v1.01.x Input File ----------------------------------
       0.75   Re           ! Reynolds number in millions
";

/// Writes a 5MW-style template deck under `dir/template` and returns its root file
pub fn write_template(dir: &Path) -> PathBuf {
    let template = dir.join("template");
    let files = [
        ("Main.fst", MAIN_FST),
        ("NRELOffshrBsline5MW_OC4DeepCwindSemi_ElastoDyn.dat", ELASTODYN),
        ("NRELOffshrBsline5MW_AeroDyn15.dat", AERODYN),
        ("Blades/NRELOffshrBsline5MW_Blade.dat", BLADE),
        ("Airfoils/Cylinder1.dat", AIRFOIL),
        ("Airfoils/DU40_A17.dat", AIRFOIL),
    ];
    for (relative, content) in files {
        let path = template.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create template directory");
        }
        fs::write(&path, content).expect("Failed to write template file");
    }
    template.join("Main.fst")
}

/// Leading token of line `index` in `path`
pub fn leading_token(path: &Path, index: usize) -> String {
    fs::read_to_string(path)
        .expect("Failed to read case file")
        .lines()
        .nth(index)
        .and_then(|line| line.split_whitespace().next())
        .expect("Line has no token")
        .to_string()
}
