use pyb_core::{Interner, PyStr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn counting(text: &'static str) -> (PyStr, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let s = PyStr::deferred(move || {
        seen.fetch_add(1, Ordering::SeqCst);
        text.to_string()
    });
    (s, calls)
}

#[test]
fn concat_of_two_parts_reads_flat() {
    let s = PyStr::lazy_concat(&PyStr::from_str("ab"), &PyStr::from_str("cd"));
    assert!(s.is_lazy());
    assert!(!s.is_materialized());
    assert_eq!(s.as_str(), "abcd");
    assert!(s.is_materialized());
    assert_eq!(s.py_hash(), PyStr::from_str("abcd").py_hash());
    assert_eq!(s, PyStr::from_str("abcd"));
}

#[test]
fn deferred_computation_runs_once() {
    let (s, calls) = counting("hello");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(s.as_str(), "hello");
    assert_eq!(s.as_str(), "hello");
    assert_eq!(s.len(), 5);
    let clone = s.clone();
    assert_eq!(clone.as_str(), "hello");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_readers_converge_on_one_materialization() {
    let (s, calls) = counting("shared");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let s = s.clone();
            thread::spawn(move || s.py_hash())
        })
        .collect();
    let hashes: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn materialize_swaps_to_direct_without_changing_value() {
    let (inner, calls) = counting("xyz");
    let mut s = PyStr::lazy_concat(&PyStr::from_str("uvw"), &inner);
    let before = s.py_hash();
    s.materialize();
    assert!(!s.is_lazy());
    assert_eq!(s.as_str(), "uvwxyz");
    assert_eq!(s.py_hash(), before);
    s.materialize();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn deep_concat_chain_flattens_iteratively() {
    let mut s = PyStr::from_str("");
    for _ in 0..50_000 {
        s = PyStr::lazy_concat(&s, &PyStr::from_str("a"));
    }
    assert_eq!(s.len(), 50_000);
    assert!(s.as_str().bytes().all(|b| b == b'a'));
}

#[test]
fn nested_lazy_parts_flatten_in_order() {
    let left = PyStr::lazy_concat(&PyStr::lazy_int(-12), &PyStr::from_str("|"));
    let right = PyStr::lazy_concat(&PyStr::lazy_float(0.5), &PyStr::from_str("é"));
    let s = PyStr::lazy_concat(&left, &right);
    assert_eq!(s.as_str(), "-12|0.5é");
    assert_eq!(s.len(), 8);
}

#[test]
fn lazy_float_uses_signed_exponents() {
    assert_eq!(PyStr::lazy_float(1e16).as_str(), "1e+16");
    assert_eq!(PyStr::lazy_float(2.0).as_str(), "2.0");
    assert_eq!(PyStr::lazy_float(f64::INFINITY).as_str(), "inf");
}

#[test]
fn short_concat_is_built_eagerly() {
    let s = PyStr::concat(&PyStr::from_str("ab"), &PyStr::from_str("cd"));
    assert!(!s.is_lazy());
    let long = PyStr::concat(&PyStr::from_str(&"x".repeat(20)), &PyStr::from_str("yyyy"));
    assert!(long.is_lazy());
    assert_eq!(long.len(), 24);
}

#[test]
fn interner_shares_storage_for_equal_text() {
    let mut interner = Interner::new();
    let a = interner.intern(&PyStr::lazy_concat(&PyStr::from_str("na"), &PyStr::from_str("me")));
    let b = interner.intern(&PyStr::from_str("name"));
    assert_eq!(interner.len(), 1);
    assert!(interner.contains("name"));
    assert!(std::ptr::eq(a.as_str().as_ptr(), b.as_str().as_ptr()));
    assert!(!a.is_lazy());
}
