use std::fs;
use tempfile::TempDir;

pub const INFO: &str = "SetDesc: \"set for the command line tests\"
SetIndex: 80000
NumMembers: 3
Flavors: [21, 2, 1]
ErrorType: replicas
Interpolator: loglinear
AlphaS_MZ: 0.118
AlphaS_Qs: [1.0, 10.0, 100.0]
AlphaS_Vals: [0.35, 0.2, 0.12]
";

// constant densities of the gluon, up and down quark for each member
const VALUES: [[f64; 3]; 3] = [[2.0, 0.5, -0.5], [1.0, 0.25, -0.5], [3.0, 0.75, -0.5]];

fn member_file(member: usize) -> String {
    let pdf_type = if member == 0 { "central" } else { "replica" };
    let row = VALUES[member].map(|value| value.to_string()).join(" ");
    let rows = vec![row; 4 * 3].join("\n");

    format!(
        "PdfType: {pdf_type}\nFormat: lhagrid1\n---\n1e-3 1e-2 0.1 1.0\n1.0 10.0 100.0\n21 2 1\n{rows}\n---\n"
    )
}

/// Write the set `CliSet` into a temporary directory, which can be used as `PDFGRID_DATA_PATH`.
pub fn data_dir() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("CliSet");

    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("CliSet.info"), INFO).unwrap();

    for member in 0..3 {
        fs::write(dir.join(format!("CliSet_{member:04}.dat")), member_file(member)).unwrap();
    }

    fs::write(tmp.path().join("pdfsets.index"), "80000 CliSet 1\n").unwrap();

    tmp
}
