//! The C-language interface for `pdfgrid`.
//!
//! A member of a PDF set is loaded with [`pdfgrid_pdf_load`], which returns an opaque handle that
//! must be released with [`pdfgrid_pdf_delete`]. All members of a set are loaded at once with
//! [`pdfgrid_pdf_load_all`] and released with [`pdfgrid_pdf_delete_all`]. Sets are searched for
//! in the directories listed in `PDFGRID_DATA_PATH` and `LHAPDF_DATA_PATH`; the name may also be
//! the path of a set directory.
//!
//! Queries never abort the calling program: a failing evaluation returns `NaN`, and a failing
//! load returns a null pointer.
//!
//! # Strings and other types
//!
//! Strings have the Rust type `*const c_char`, which corresponds to the C type `const char*`.
//! They are assumed to be encoded using UTF-8. All other types (`f64`, `usize`, `i32`) correspond
//! to the C types given by the [translation tables] of cbindgen.
//!
//! [translation tables]: https://github.com/eqrion/cbindgen/blob/master/docs.md#std-types

use pdfgrid::pdf::Pdf;
use pdfgrid::set::PdfSet;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::slice;

/// Load member `member` of the PDF set `name`. Returns a null pointer if the set cannot be found
/// or read.
///
/// # Safety
///
/// The parameter `name` must be a valid, null-terminated C string.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_load(name: *const c_char, member: usize) -> Option<Box<Pdf>> {
    if name.is_null() {
        return None;
    }

    let name = unsafe { CStr::from_ptr(name) }.to_str().ok()?;

    Pdf::load(name, member).ok().map(Box::new)
}

/// Delete a PDF previously created with `pdfgrid_pdf_load`. Passing a null pointer does nothing.
#[unsafe(no_mangle)]
#[allow(unused_variables)]
pub extern "C" fn pdfgrid_pdf_delete(pdf: Option<Box<Pdf>>) {}

/// Return `x f(x, Q2)` of the parton with PDG id `pid`, or `NaN` if the arguments are invalid.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_xfxq2(pdf: *const Pdf, pid: i32, x: f64, q2: f64) -> f64 {
    let pdf = unsafe { &*pdf };

    pdf.xfxq2(pid, x, q2).unwrap_or(f64::NAN)
}

/// Evaluate `x f(x, Q2)` for every combination of `pids`, `xs` and `q2s`. The results are
/// written to `results` in the order `[pid][x][q2]`, so the last index varies fastest. Returns
/// `false` if any argument is invalid, in which case every result is `NaN`, or if the number of
/// results overflows, in which case nothing is written. Arrays of length zero may be null.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`. The arrays `pids`,
/// `xs` and `q2s` must have `pids_len`, `xs_len` and `q2s_len` entries, and `results` must have
/// room for `pids_len * xs_len * q2s_len` values.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_xfxq2s(
    pdf: *const Pdf,
    pids_len: usize,
    pids: *const i32,
    xs_len: usize,
    xs: *const f64,
    q2s_len: usize,
    q2s: *const f64,
    results: *mut f64,
) -> bool {
    let Some(len) = pids_len
        .checked_mul(xs_len)
        .and_then(|len| len.checked_mul(q2s_len))
    else {
        return false;
    };

    if len == 0 {
        return true;
    }

    let pdf = unsafe { &*pdf };
    let pids = unsafe { slice::from_raw_parts(pids, pids_len) };
    let xs = unsafe { slice::from_raw_parts(xs, xs_len) };
    let q2s = unsafe { slice::from_raw_parts(q2s, q2s_len) };
    let results = unsafe { slice::from_raw_parts_mut(results, len) };

    match pdf.xfxq2s(pids, xs, q2s) {
        Ok(values) => {
            for (result, value) in results.iter_mut().zip(values.iter()) {
                *result = *value;
            }
            true
        }
        Err(_) => {
            results.fill(f64::NAN);
            false
        }
    }
}

/// Return the strong coupling at `q2`, or `NaN` if it is not available.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_alphas_q2(pdf: *const Pdf, q2: f64) -> f64 {
    let pdf = unsafe { &*pdf };

    pdf.alphas_q2(q2).unwrap_or(f64::NAN)
}

/// Smallest x knot of `pdf`.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_x_min(pdf: *const Pdf) -> f64 {
    unsafe { &*pdf }.x_min()
}

/// Largest x knot of `pdf`.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_x_max(pdf: *const Pdf) -> f64 {
    unsafe { &*pdf }.x_max()
}

/// Smallest Q knot of `pdf`; note that this is not squared.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_q_min(pdf: *const Pdf) -> f64 {
    unsafe { &*pdf }.q_min()
}

/// Largest Q knot of `pdf`; note that this is not squared.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_q_max(pdf: *const Pdf) -> f64 {
    unsafe { &*pdf }.q_max()
}

/// LHAPDF id of the central member of the set, or `-1` if the set does not have one.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_set_index(pdf: *const Pdf) -> i64 {
    unsafe { &*pdf }.set_index().map_or(-1, i64::from)
}

/// Number of flavors tabulated in `pdf`.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_pid_count(pdf: *const Pdf) -> usize {
    unsafe { &*pdf }.pids().len()
}

/// Write the PDG ids of the flavors tabulated in `pdf` to `pids`.
///
/// # Safety
///
/// The parameter `pdf` must point to a PDF created by `pdfgrid_pdf_load` and `pids` must have
/// room for as many values as `pdfgrid_pdf_pid_count` returns.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pdfgrid_pdf_pids(pdf: *const Pdf, pids: *mut i32) {
    let pdf = unsafe { &*pdf };

    if pids.is_null() || pdf.pids().is_empty() {
        return;
    }

    let pids = unsafe { slice::from_raw_parts_mut(pids, pdf.pids().len()) };

    pids.copy_from_slice(pdf.pids());
}

/// Load all members of the PDF set `name`. Returns a null pointer if the set cannot be found or
/// read. The members are accessed with `pdfgrid_set_member` and the set must be released with
/// `pdfgrid_pdf_delete_all`.
///
/// # Safety
///
/// The parameter `name` must be a valid, null-terminated C string.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_pdf_load_all(name: *const c_char) -> Option<Box<PdfSet>> {
    if name.is_null() {
        return None;
    }

    let name = unsafe { CStr::from_ptr(name) }.to_str().ok()?;

    PdfSet::load(name).ok().map(Box::new)
}

/// Delete a set previously created with `pdfgrid_pdf_load_all`, including all of its members.
/// Passing a null pointer does nothing.
#[unsafe(no_mangle)]
#[allow(unused_variables)]
pub extern "C" fn pdfgrid_pdf_delete_all(set: Option<Box<PdfSet>>) {}

/// Number of members of `set`.
///
/// # Safety
///
/// The parameter `set` must point to a set created by `pdfgrid_pdf_load_all`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_set_len(set: *const PdfSet) -> usize {
    unsafe { &*set }.len()
}

/// Member `member` of `set`, or a null pointer if there is no such member. The returned PDF is
/// owned by the set: it must not be deleted with `pdfgrid_pdf_delete` and is valid until the set
/// is deleted.
///
/// # Safety
///
/// The parameter `set` must point to a set created by `pdfgrid_pdf_load_all`.
#[unsafe(no_mangle)]
#[must_use]
pub unsafe extern "C" fn pdfgrid_set_member(set: *const PdfSet, member: usize) -> *const Pdf {
    unsafe { &*set }
        .member(member)
        .map_or(ptr::null(), ptr::from_ref)
}
