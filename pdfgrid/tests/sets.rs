#![allow(missing_docs)]

use float_cmp::assert_approx_eq;
use pdfgrid::cache::PdfCache;
use pdfgrid::error::Error;
use pdfgrid::manage::SetResolver;
use pdfgrid::metadata::{ForcePositive, InterpolatorType};
use pdfgrid::pdf::Pdf;
use pdfgrid::set::PdfSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const SET: &str = "SynthSet";
const XS: [f64; 9] = [1e-5, 1e-4, 1e-3, 1e-2, 0.1, 0.3, 0.5, 0.9, 1.0];
const QS: [&[f64]; 2] = [&[1.0, 1.5, 2.0, 3.0, 4.5], &[4.5, 10.0, 30.0, 100.0, 1000.0]];
const PIDS: [i32; 4] = [-1, 21, 1, 2];

const INFO: &str = "SetDesc: \"synthetic set\"
SetIndex: 90000
Authors: nobody
Format: lhagrid1
DataVersion: 1
NumMembers: 4
Flavors: [-1, 21, 1, 2]
OrderQCD: 2
ErrorType: replicas
QMin: 1.0
QMax: 1000.0
MZ: 91.1876
AlphaS_Type: ipol
AlphaS_Qs: [1.0, 2.0, 4.5, 4.5, 10.0, 100.0, 1000.0]
AlphaS_Vals: [0.5, 0.3, 0.22, 0.21, 0.18, 0.12, 0.09]
";

#[allow(clippy::cast_precision_loss)]
fn scale(member: usize) -> f64 {
    if member == 0 {
        1.2
    } else {
        1.0 + 0.1 * member as f64
    }
}

fn xf(member: usize, pid: i32, x: f64, q2: f64) -> f64 {
    let weight = match pid {
        -1 => 0.5,
        21 => 2.0,
        1 => 1.0,
        _ => 1.5,
    };

    scale(member) * weight * x.powf(-0.3) * (1.0 - x).powi(3) * (1.0 + 0.05 * q2.ln())
}

fn line(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| format!("{value:e}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn member_file(member: usize) -> String {
    let pdf_type = if member == 0 { "central" } else { "replica" };
    let mut contents = format!("PdfType: {pdf_type}\nFormat: lhagrid1\n---\n");

    for qs in QS {
        contents.push_str(&format!("{}\n{}\n", line(&XS), line(qs)));
        contents.push_str(&format!("{}\n", PIDS.map(|pid| pid.to_string()).join(" ")));

        for &x in &XS {
            for &q in qs {
                let row: Vec<_> = PIDS.iter().map(|&pid| xf(member, pid, x, q * q)).collect();
                contents.push_str(&format!("{}\n", line(&row)));
            }
        }

        contents.push_str("---\n");
    }

    contents
}

fn write_set(root: &Path) -> PathBuf {
    let dir = root.join(SET);
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join(format!("{SET}.info")), INFO).unwrap();

    for member in 0..4 {
        fs::write(
            dir.join(format!("{SET}_{member:04}.dat")),
            member_file(member),
        )
        .unwrap();
    }

    dir
}

fn modify(path: &Path, from: &str, to: &str) {
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains(from));
    fs::write(path, contents.replace(from, to)).unwrap();
}

fn synthetic_set() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = write_set(tmp.path());
    (tmp, dir)
}

#[test]
fn bounds_and_metadata() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 2).unwrap();

    assert_eq!(pdf.set_name(), SET);
    assert_eq!(pdf.member(), 2);
    assert_eq!(pdf.pdf_type(), Some("replica"));
    assert_eq!(pdf.x_bounds(), (1e-5, 1.0));
    assert_eq!(pdf.q_min(), 1.0);
    assert_eq!(pdf.q_max(), 1000.0);
    assert_eq!(pdf.q2_bounds(), (1.0, 1e6));
    assert_eq!(pdf.pids(), PIDS);
    assert_eq!(pdf.subgrid_count(), 2);
    assert_eq!(pdf.set_index(), Some(90000));
    assert_eq!(pdf.lhapdf_id(), Some(90002));
    assert_eq!(pdf.interpolator(), InterpolatorType::LogBicubic);
    assert_eq!(pdf.interpolation_order(), 4);
    assert_eq!(pdf.set_desc(), "synthetic set");
    assert_eq!(pdf.num_members(), Some(4));
}

#[test]
fn knots_are_reproduced() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 0).unwrap();

    for (index, subgrid) in pdf.subgrids().iter().enumerate() {
        for (ix, &x) in subgrid.xs().iter().enumerate() {
            for (iq, &q2) in subgrid.q2s().iter().enumerate() {
                for &pid in &PIDS {
                    let knot = pdf.xf_at_knot(pid, index, ix, iq).unwrap();
                    assert_approx_eq!(f64, knot, xf(0, pid, x, q2), epsilon = 1e-14);
                    assert_approx_eq!(
                        f64,
                        pdf.xfxq2(pid, x, q2).unwrap(),
                        knot,
                        epsilon = 1e-12 * knot.abs().max(1.0)
                    );
                }
            }
        }
    }

    assert!(matches!(pdf.xf_at_knot(21, 2, 0, 0), Err(Error::Domain(_))));
    assert!(matches!(pdf.xf_at_knot(21, 0, 9, 0), Err(Error::Domain(_))));
}

#[test]
fn interpolation_between_knots() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 0).unwrap();

    for &(x, q2) in &[(3e-3, 5.0), (0.2, 50.0), (5e-5, 2e5), (0.05, 1.2)] {
        let value = pdf.xfxq2(21, x, q2).unwrap();
        let expected = xf(0, 21, x, q2);
        assert!(
            (value - expected).abs() < 5e-2 * expected,
            "x = {x}, Q2 = {q2}: {value} vs {expected}"
        );
    }

    // the gluon can be addressed with 0
    assert_eq!(
        pdf.xfxq2(0, 0.2, 50.0).unwrap(),
        pdf.xfxq2(21, 0.2, 50.0).unwrap()
    );
}

#[test]
fn batches_agree_with_single_points() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 1).unwrap();

    let pids = [2, 21, -1];
    let xs = [1e-6, 1e-4, 0.35, 1.0];
    let q2s = [0.5, 2.0, 20.25, 1e4, 1e7];
    let values = pdf.xfxq2s(&pids, &xs, &q2s).unwrap();

    assert_eq!(values.shape(), [3, 4, 5]);

    for (ip, &pid) in pids.iter().enumerate() {
        for (ix, &x) in xs.iter().enumerate() {
            for (iq, &q2) in q2s.iter().enumerate() {
                assert_eq!(values[[ip, ix, iq]], pdf.xfxq2(pid, x, q2).unwrap());
            }
        }
    }

    let all = pdf.xfxq2_all(0.35, 1e4).unwrap();
    assert_eq!(all.len(), PIDS.len());
    assert_eq!(all[1], values[[1, 2, 3]]);

    assert!(matches!(
        pdf.xfxq2s(&[21, 5], &xs, &q2s),
        Err(Error::UnknownFlavor(5))
    ));
    assert!(matches!(
        pdf.xfxq2s(&[21], &[0.1, 0.0], &q2s),
        Err(Error::Domain(_))
    ));
}

#[test]
fn invalid_queries() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 0).unwrap();

    for &(x, q2) in &[
        (0.0, 10.0),
        (-0.1, 10.0),
        (1.5, 10.0),
        (f64::NAN, 10.0),
        (0.1, 0.0),
        (0.1, -4.0),
        (0.1, f64::INFINITY),
    ] {
        assert!(matches!(pdf.xfxq2(21, x, q2), Err(Error::Domain(_))));
    }

    assert!(matches!(pdf.xfxq2(5, 0.1, 10.0), Err(Error::UnknownFlavor(5))));
    assert!(matches!(pdf.xfxq2(22, 0.1, 10.0), Err(Error::UnknownFlavor(22))));
    // the domain is checked first
    assert!(matches!(pdf.xfxq2(5, 0.0, 10.0), Err(Error::Domain(_))));
}

#[test]
fn extrapolation_is_deterministic() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 0).unwrap();

    for &(x, q2) in &[(1e-7, 100.0), (1e-3, 0.25), (0.1, 1e8), (1e-8, 1e9), (1e-8, 0.1)] {
        let value = pdf.xfxq2(2, x, q2).unwrap();

        assert!(value.is_finite(), "x = {x}, Q2 = {q2}");
        assert_eq!(value, pdf.xfxq2(2, x, q2).unwrap());
    }
}

#[test]
fn force_positive() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 0)
        .unwrap()
        .with_force_positive(ForcePositive::ClipSmall);

    assert_eq!(pdf.force_positive(), ForcePositive::ClipSmall);
    // the PDFs vanish at x = 1
    assert_eq!(pdf.xfxq2(21, 1.0, 100.0).unwrap(), 1e-10);
    assert!(pdf.xfxq2(21, 0.1, 100.0).unwrap() > 1e-10);
}

#[test]
fn coupling() {
    let (_tmp, dir) = synthetic_set();
    let pdf = Pdf::from_dir(&dir, 0).unwrap();

    assert_approx_eq!(f64, pdf.alphas_q2(4.0).unwrap(), 0.3, epsilon = 1e-14);
    assert_approx_eq!(f64, pdf.alphas_q2(100.0).unwrap(), 0.18, epsilon = 1e-14);
    // the lower range wins on the threshold
    assert_approx_eq!(f64, pdf.alphas_q2(20.25).unwrap(), 0.22, epsilon = 1e-14);

    let high = pdf.alphas_q2(1e8).unwrap();
    assert!(high.is_finite() && high < 0.09);
    let low = pdf.alphas_q2(0.5).unwrap();
    assert!(low.is_finite() && low > 0.5);

    assert!(matches!(pdf.alphas_q2(0.0), Err(Error::Domain(_))));
}

#[test]
fn missing_coupling() {
    let (_tmp, dir) = synthetic_set();
    let info = dir.join(format!("{SET}.info"));
    modify(&info, "AlphaS_Type: ipol\n", "");
    modify(
        &info,
        "AlphaS_Qs: [1.0, 2.0, 4.5, 4.5, 10.0, 100.0, 1000.0]\n",
        "",
    );
    modify(
        &info,
        "AlphaS_Vals: [0.5, 0.3, 0.22, 0.21, 0.18, 0.12, 0.09]\n",
        "",
    );

    let pdf = Pdf::from_dir(&dir, 0).unwrap();
    assert!(matches!(pdf.alphas_q2(100.0), Err(Error::Coupling(_))));

    // an interpolated coupling without tables is a broken set
    modify(&info, "MZ: 91.1876\n", "MZ: 91.1876\nAlphaS_Type: ipol\n");
    assert!(matches!(Pdf::from_dir(&dir, 0), Err(Error::Format(_))));
}

#[test]
fn knots_must_increase() {
    let (_tmp, dir) = synthetic_set();
    modify(&dir.join(format!("{SET}_0000.dat")), "1e-4 1e-3", "1e-3 1e-4");

    assert!(matches!(Pdf::from_dir(&dir, 0), Err(Error::Format(_))));
    // other members are not affected
    assert!(Pdf::from_dir(&dir, 1).is_ok());
    // loading a set is all-or-nothing
    assert!(matches!(PdfSet::from_dir(&dir), Err(Error::Format(_))));
}

#[test]
fn subgrids_must_meet_at_a_seam() {
    let (_tmp, dir) = synthetic_set();
    modify(&dir.join(format!("{SET}_0000.dat")), "4.5e0 1e1", "5e0 1e1");

    let Err(Error::Format(message)) = Pdf::from_dir(&dir, 0) else {
        panic!("expected a format error");
    };
    assert!(message.ends_with("subgrid 0 ends at Q = 4.5, but subgrid 1 starts at Q = 5"));
}

#[test]
fn flavors_must_match() {
    let (_tmp, dir) = synthetic_set();
    let path = dir.join(format!("{SET}_0000.dat"));
    let contents = fs::read_to_string(&path).unwrap();
    let position = contents.rfind("-1 21 1 2\n").unwrap();
    let mut changed = contents.clone();
    changed.replace_range(position..position + 9, "-1 21 2 1");
    fs::write(&path, changed).unwrap();

    assert!(matches!(Pdf::from_dir(&dir, 0), Err(Error::Format(_))));

    fs::write(&path, contents).unwrap();
    modify(
        &dir.join(format!("{SET}.info")),
        "Flavors: [-1, 21, 1, 2]",
        "Flavors: [-1, 21, 1]",
    );

    let Err(Error::Format(message)) = Pdf::from_dir(&dir, 0) else {
        panic!("expected a format error");
    };
    assert!(message.ends_with("flavor 2 is not declared in the Flavors of the set"));
}

#[test]
fn unparsable_values() {
    let (_tmp, dir) = synthetic_set();
    modify(&dir.join(format!("{SET}_0003.dat")), "1e-5 1e-4", "1e-5 abc");

    let Err(Error::Format(message)) = Pdf::from_dir(&dir, 3) else {
        panic!("expected a format error");
    };
    assert!(message.contains("SynthSet_0003.dat"));
    assert!(message.contains("could not parse 'abc' in the x knots"));
}

#[test]
fn missing_files() {
    let (tmp, dir) = synthetic_set();

    assert!(matches!(Pdf::from_dir(&dir, 4), Err(Error::Io { .. })));
    assert!(matches!(
        Pdf::from_dir(&tmp.path().join("Missing"), 0),
        Err(Error::Io { .. })
    ));
    assert!(matches!(
        SetResolver::new().with_path(tmp.path()).load_pdf("Missing", 0),
        Err(Error::UnknownSet(_))
    ));
}

#[test]
fn all_members() {
    let (_tmp, dir) = synthetic_set();
    let set = PdfSet::from_dir(&dir).unwrap();

    assert_eq!(set.name(), SET);
    assert_eq!(set.path(), dir);
    assert_eq!(set.len(), 4);
    assert!(!set.is_empty());
    assert_eq!(set.central().pdf_type(), Some("central"));
    assert!(set.member(4).is_none());

    for (index, pdf) in set.iter().enumerate() {
        assert_eq!(pdf.member(), index);
        assert_approx_eq!(
            f64,
            pdf.xfxq2(1, 1e-3, 100.0).unwrap(),
            xf(index, 1, 1e-3, 100.0),
            epsilon = 1e-14
        );
    }

    let members = set.into_members();
    assert_eq!(members.len(), 4);
    assert_eq!(members[3].lhapdf_id(), Some(90003));
}

#[test]
fn members_without_num_members() {
    let (_tmp, dir) = synthetic_set();
    modify(&dir.join(format!("{SET}.info")), "NumMembers: 4\n", "");
    fs::remove_file(dir.join(format!("{SET}_0003.dat"))).unwrap();

    assert_eq!(PdfSet::from_dir(&dir).unwrap().len(), 3);
}

#[test]
fn replica_uncertainty() {
    let (_tmp, dir) = synthetic_set();
    let set = PdfSet::from_dir(&dir).unwrap();
    let base = xf(0, 21, 1e-3, 100.0) / scale(0);

    let uncertainty = set.xfxq2_uncertainty(21, 1e-3, 100.0).unwrap();

    assert_approx_eq!(f64, uncertainty.central, 1.2 * base, epsilon = 1e-12);
    assert_approx_eq!(f64, uncertainty.errsymm, 0.1 * base, epsilon = 1e-12);
    assert_eq!(uncertainty.errplus, uncertainty.errsymm);
    assert_eq!(uncertainty.errminus, uncertainty.errsymm);

    assert!(matches!(set.uncertainty(&[1.0, 2.0]), Err(Error::Format(_))));
}

#[test]
fn hessian_uncertainty() {
    let (_tmp, dir) = synthetic_set();
    modify(
        &dir.join(format!("{SET}.info")),
        "ErrorType: replicas",
        "ErrorType: symmhessian+as",
    );
    let set = PdfSet::from_dir(&dir).unwrap();

    // members 2 and 3 are the coupling variations
    let uncertainty = set.uncertainty(&[1.0, 1.5, 7.0, -7.0]).unwrap();
    assert_eq!(uncertainty.central, 1.0);
    assert_eq!(uncertainty.errsymm, 0.5);
}

#[test]
fn resolution_by_name_and_id() {
    let (tmp, dir) = synthetic_set();
    fs::write(tmp.path().join("pdfsets.index"), "90000 SynthSet 1\n").unwrap();
    let resolver = SetResolver::new().with_path(tmp.path());

    assert_eq!(resolver.resolve(SET).unwrap(), dir);
    assert_eq!(resolver.available_sets(), [SET]);

    assert_eq!(resolver.load_spec("SynthSet").unwrap().member(), 0);
    assert_eq!(resolver.load_spec("SynthSet/2").unwrap().member(), 2);

    let pdf = resolver.load_spec("90003").unwrap();
    assert_eq!(pdf.set_name(), SET);
    assert_eq!(pdf.member(), 3);
}

#[test]
fn cached_sets() {
    let (tmp, _dir) = synthetic_set();
    let mut cache = PdfCache::new(SetResolver::new().with_path(tmp.path()));

    assert!(cache.is_empty());
    assert!(cache.get(SET).is_none());

    let first = cache.get_or_load(SET).unwrap();
    let second = cache.get_or_load(SET).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert!(cache.get(SET).is_some());

    assert!(matches!(
        cache.get_or_load("Missing"),
        Err(Error::UnknownSet(_))
    ));
    assert_eq!(cache.len(), 1);

    assert!(cache.evict(SET).is_some());
    assert!(cache.is_empty());

    cache.get_or_load(SET).unwrap();
    cache.clear();
    assert!(cache.is_empty());
}
